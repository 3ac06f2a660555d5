use meme_generator::config::{Configuration, ResizeFilter};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn empty_document_uses_defaults() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (400, 400));
    assert_eq!(cfg.canvas.background, [0, 0, 0]);
    assert_eq!(cfg.canvas.filter, ResizeFilter::Triangle);
    assert_eq!(cfg.caption.font_family, "Impact");
    assert!((cfg.caption.size_pt - 40.0).abs() < f32::EPSILON);
    assert!((cfg.caption.top_baseline - 60.0).abs() < f32::EPSILON);
    assert!((cfg.caption.bottom_margin - 20.0).abs() < f32::EPSILON);
    assert_eq!(cfg.caption.fill, [255, 255, 255]);
    assert_eq!(cfg.caption.stroke, [0, 0, 0]);
    assert!(cfg.speech.enabled);
    assert_eq!(cfg.speech.program, "espeak-ng");
    assert_eq!(cfg.speech.volume.value(), 100);
}

#[test]
fn parse_kebab_case_sections() {
    let yaml = r#"
canvas:
  width: 640
  height: 480
  background: [10, 20, 30]
  filter: lanczos3
caption:
  font-family: Anton
  font-path: /fonts/anton.ttf
  size-pt: 30
  line-width: 3.5
speech:
  enabled: false
  default-voice: en-us
  volume: 42
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (640, 480));
    assert_eq!(cfg.canvas.background, [10, 20, 30]);
    assert_eq!(cfg.canvas.filter, ResizeFilter::Lanczos3);
    assert_eq!(cfg.caption.font_family, "Anton");
    assert_eq!(cfg.caption.font_path, Some(PathBuf::from("/fonts/anton.ttf")));
    assert!((cfg.caption.size_px() - 40.0).abs() < 1e-4);
    assert!(!cfg.speech.enabled);
    assert_eq!(cfg.speech.default_voice.as_deref(), Some("en-us"));
    assert_eq!(cfg.speech.volume.value(), 42);
}

#[test]
fn default_caption_is_forty_points() {
    let cfg = Configuration::default();
    assert!((cfg.caption.size_px() - 160.0 / 3.0).abs() < 1e-4);
}

#[test]
fn volume_above_hundred_is_rejected() {
    let yaml = "speech:\n  volume: 150\n";
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn validation_rejects_zero_canvas() {
    let cfg: Configuration = serde_yaml::from_str("canvas:\n  width: 0\n").unwrap();
    assert!(cfg.validated().is_err());
}

#[test]
fn validation_rejects_bad_caption_and_speech() {
    let cfg: Configuration = serde_yaml::from_str("caption:\n  size-pt: 0\n").unwrap();
    assert!(cfg.validated().is_err());
    let cfg: Configuration = serde_yaml::from_str("caption:\n  line-width: -1\n").unwrap();
    assert!(cfg.validated().is_err());
    let cfg: Configuration = serde_yaml::from_str("speech:\n  program: ''\n").unwrap();
    assert!(cfg.validated().is_err());
    let cfg: Configuration =
        serde_yaml::from_str("speech:\n  enabled: false\n  program: ''\n").unwrap();
    assert!(cfg.validated().is_ok());
}

#[test]
fn unknown_filter_is_an_error() {
    assert!(serde_yaml::from_str::<Configuration>("canvas:\n  filter: bicubic\n").is_err());
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "canvas:\n  width: 123").unwrap();
    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.canvas.width, 123);
    assert_eq!(cfg.canvas.height, 400);
}
