use meme_generator::processing::layout::{fit, try_fit, FitResult};
use meme_generator::Error;

fn rect_close(a: FitResult, b: (f64, f64, f64, f64), eps: f64) {
    assert!((a.width - b.0).abs() <= eps, "w mismatch: {:?} vs {:?}", a, b);
    assert!((a.height - b.1).abs() <= eps, "h mismatch: {:?} vs {:?}", a, b);
    assert!((a.offset_x - b.2).abs() <= eps, "x mismatch: {:?} vs {:?}", a, b);
    assert!((a.offset_y - b.3).abs() <= eps, "y mismatch: {:?} vs {:?}", a, b);
}

#[test]
fn portrait_into_square_container() {
    // aspect 0.5: full height, centered horizontally
    rect_close(fit(500.0, 500.0, 100.0, 200.0), (250.0, 500.0, 125.0, 0.0), 1e-9);
}

#[test]
fn landscape_into_square_container() {
    // aspect 2: full width, centered vertically
    rect_close(fit(500.0, 500.0, 200.0, 100.0), (500.0, 250.0, 0.0, 125.0), 1e-9);
}

#[test]
fn square_into_square_container() {
    rect_close(fit(400.0, 400.0, 50.0, 50.0), (400.0, 400.0, 0.0, 0.0), 1e-9);
}

#[test]
fn wide_into_tall_container() {
    // aspect 3: width 300, height 100, y = (600 - 100) / 2
    rect_close(fit(300.0, 600.0, 900.0, 300.0), (300.0, 100.0, 0.0, 250.0), 1e-9);
}

#[test]
fn square_content_in_wide_container_keeps_width_branch() {
    // The width branch is kept even though it overflows a wide container.
    let r = fit(600.0, 300.0, 80.0, 80.0);
    rect_close(r, (600.0, 600.0, 0.0, -150.0), 1e-9);
}

#[test]
fn aspect_ratio_preserved_across_shapes() {
    let containers = [(500.0, 500.0), (300.0, 600.0), (1920.0, 1080.0), (1.0, 7.0)];
    let contents = [(1.0, 3.0), (4032.0, 3024.0), (3024.0, 4032.0), (17.0, 17.0), (999.0, 1.0)];
    for &(cw, ch) in &containers {
        for &(iw, ih) in &contents {
            let r = fit(cw, ch, iw, ih);
            let expected: f64 = iw / ih;
            assert!(
                ((r.width / r.height) - expected).abs() <= expected * 1e-9,
                "aspect changed for {iw}x{ih} in {cw}x{ch}: {r:?}"
            );
            assert!(r.width == cw || r.height == ch, "no axis spans: {r:?}");
        }
    }
}

#[test]
fn content_stays_inside_square_containers() {
    let contents = [(1.0, 3.0), (4032.0, 3024.0), (3024.0, 4032.0), (17.0, 17.0), (999.0, 1.0)];
    for side in [1.0, 400.0, 1234.5] {
        for &(iw, ih) in &contents {
            let r = fit(side, side, iw, ih);
            let eps = 1e-9 * side;
            assert!(r.offset_x >= 0.0 && r.offset_y >= 0.0, "{r:?}");
            assert!(r.offset_x + r.width <= side + eps, "{r:?}");
            assert!(r.offset_y + r.height <= side + eps, "{r:?}");
        }
    }
}

#[test]
fn centered_axis_is_symmetric() {
    let r = fit(640.0, 480.0, 300.0, 900.0);
    let right_gap = 640.0 - (r.offset_x + r.width);
    assert!((r.offset_x - right_gap).abs() < 1e-9);
    assert_eq!(r.offset_y, 0.0);
}

#[test]
fn repeated_calls_are_identical() {
    let a = fit(333.0, 777.0, 123.0, 456.0);
    let b = fit(333.0, 777.0, 123.0, 456.0);
    assert_eq!(a, b);
}

#[test]
fn try_fit_matches_fit_on_valid_input() {
    let checked = try_fit(300.0, 600.0, 900.0, 300.0).unwrap();
    assert_eq!(checked, fit(300.0, 600.0, 900.0, 300.0));
}

#[test]
fn try_fit_rejects_degenerate_dimensions() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        for slot in 0..4 {
            let mut args = [400.0, 400.0, 100.0, 100.0];
            args[slot] = bad;
            let res = try_fit(args[0], args[1], args[2], args[3]);
            assert!(
                matches!(res, Err(Error::InvalidDimension { .. })),
                "accepted {bad} in slot {slot}"
            );
        }
    }
}
