use std::path::PathBuf;
use xmpair::engine::{Answer, classify_extension, is_os_hidden_file, parse_answer, split_file_name};
use xmpair::pipeline::{match_pairs, payload_lines};
use xmpair::utils::config::image_extension_priority;
use xmpair::utils::xmpair_toml::{apply_file_to_opts, parse_xmpair_toml};
use xmpair::{Candidate, CandidateKind, Opts, PairOutcome, RunSummary};

fn candidate(file_name: &str) -> Candidate {
    let (base_name, extension) = split_file_name(file_name);
    let kind = classify_extension(&extension).expect("classifiable test file");
    Candidate {
        base_name,
        extension,
        full_path: PathBuf::from("/photos").join(file_name),
        kind,
    }
}

fn file_names(pairs: &[xmpair::Pair]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|p| (p.image.file_name(), p.text.file_name()))
        .collect()
}

// --- split_file_name ---

#[test]
fn test_split_simple() {
    assert_eq!(split_file_name("cat.jpg"), ("cat".into(), "jpg".into()));
}

#[test]
fn test_split_lowercases_extension_only() {
    assert_eq!(split_file_name("Cat.JPG"), ("Cat".into(), "jpg".into()));
}

#[test]
fn test_split_multiple_dots() {
    assert_eq!(split_file_name("a.b.txt"), ("a.b".into(), "txt".into()));
}

#[test]
fn test_split_dotfile_has_no_extension() {
    assert_eq!(split_file_name(".hidden"), (".hidden".into(), String::new()));
    assert_eq!(split_file_name("noext"), ("noext".into(), String::new()));
}

#[test]
fn test_split_leading_dots_stay_in_base_name() {
    assert_eq!(split_file_name("..txt"), ("..txt".into(), String::new()));
    assert_eq!(split_file_name("...jpg"), ("...jpg".into(), String::new()));
    assert_eq!(split_file_name(".cat.txt"), (".cat".into(), "txt".into()));
}

// --- classify_extension ---

#[test]
fn test_classify_images_and_text() {
    for ext in ["png", "jpg", "jpeg", "tiff"] {
        assert_eq!(classify_extension(ext), Some(CandidateKind::Image));
    }
    assert_eq!(classify_extension("txt"), Some(CandidateKind::Text));
}

#[test]
fn test_classify_ignores_others() {
    for ext in ["tif", "gif", "xmp", "md", ""] {
        assert_eq!(classify_extension(ext), None);
    }
}

#[test]
fn test_image_priority_is_alphabetical() {
    assert!(image_extension_priority("jpeg") < image_extension_priority("jpg"));
    assert!(image_extension_priority("jpg") < image_extension_priority("png"));
    assert!(image_extension_priority("png") < image_extension_priority("tiff"));
}

// --- is_os_hidden_file ---

#[test]
fn test_os_hidden_files() {
    assert!(is_os_hidden_file(&PathBuf::from("/x/._cat.jpg")));
    assert!(is_os_hidden_file(&PathBuf::from("/x/.DS_Store")));
    assert!(is_os_hidden_file(&PathBuf::from("/x/Thumbs.db")));
    assert!(!is_os_hidden_file(&PathBuf::from("/x/cat.jpg")));
}

// --- match_pairs ---

#[test]
fn test_match_only_overlapping_names() {
    let images = vec![candidate("cat.jpg"), candidate("dog.png")];
    let texts = vec![candidate("cat.txt"), candidate("bird.txt")];
    let pairs = match_pairs(&images, &texts);
    assert_eq!(file_names(&pairs), vec![("cat.jpg".into(), "cat.txt".into())]);
}

#[test]
fn test_match_is_case_sensitive_on_base_name() {
    let images = vec![candidate("Cat.jpg")];
    let texts = vec![candidate("cat.txt")];
    assert!(match_pairs(&images, &texts).is_empty());
}

#[test]
fn test_match_ignores_extension_case() {
    let images = vec![candidate("cat.JPG")];
    let texts = vec![candidate("cat.TXT")];
    assert_eq!(
        file_names(&match_pairs(&images, &texts)),
        vec![("cat.JPG".into(), "cat.TXT".into())]
    );
}

#[test]
fn test_match_one_pair_per_base_name() {
    let images = vec![
        candidate("photo.png"),
        candidate("photo.tiff"),
        candidate("photo.jpg"),
    ];
    let texts = vec![candidate("photo.txt")];
    let pairs = match_pairs(&images, &texts);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].image.file_name(), "photo.jpg");
}

#[test]
fn test_match_jpeg_beats_jpg() {
    let images = vec![candidate("photo.jpg"), candidate("photo.jpeg")];
    let texts = vec![candidate("photo.txt")];
    assert_eq!(match_pairs(&images, &texts)[0].image.file_name(), "photo.jpeg");
}

#[test]
fn test_match_same_extension_prefers_smaller_file_name() {
    let images = vec![candidate("photo.jpg"), candidate("photo.JPG")];
    let texts = vec![candidate("photo.txt"), candidate("photo.TXT")];
    let pairs = match_pairs(&images, &texts);
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].image.file_name(), "photo.JPG");
    assert_eq!(pairs[0].text.file_name(), "photo.TXT");
}

#[test]
fn test_match_independent_of_input_order() {
    let mut images = vec![
        candidate("b.png"),
        candidate("a.jpg"),
        candidate("a.png"),
        candidate("c.tiff"),
    ];
    let mut texts = vec![candidate("c.txt"), candidate("a.txt"), candidate("b.txt")];
    let first = match_pairs(&images, &texts);
    images.reverse();
    texts.reverse();
    let second = match_pairs(&images, &texts);
    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(|p| p.base_name()).collect::<Vec<_>>(),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_match_empty_inputs() {
    assert!(match_pairs(&[], &[]).is_empty());
    assert!(match_pairs(&[candidate("a.jpg")], &[]).is_empty());
}

// --- payload_lines ---

#[test]
fn test_payload_simple_lines() {
    assert_eq!(payload_lines("a\nb\nc"), vec!["a", "b", "c"]);
}

#[test]
fn test_payload_outer_trim_only() {
    assert_eq!(
        payload_lines("\n\n  first tag\n second tag  \n\n"),
        vec!["first tag", " second tag"]
    );
}

#[test]
fn test_payload_drops_blank_lines_and_crlf() {
    assert_eq!(payload_lines("a\r\n\r\n   \r\nb\r\n"), vec!["a", "b"]);
}

#[test]
fn test_payload_strips_bom() {
    assert_eq!(payload_lines("\u{feff}tag\n"), vec!["tag"]);
}

#[test]
fn test_payload_empty() {
    assert!(payload_lines("").is_empty());
    assert!(payload_lines(" \n\t\n").is_empty());
}

#[test]
fn test_payload_count_matches_non_blank_lines() {
    let text = "one\ntwo\n\nthree\n  \nfour";
    let lines = payload_lines(text);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines, vec!["one", "two", "three", "four"]);
}

#[test]
fn test_payload_lone_cr_splits_lines() {
    assert_eq!(payload_lines("a\rb\rc"), vec!["a", "b", "c"]);
}

#[test]
fn test_payload_unicode_separators_split_lines() {
    assert_eq!(
        payload_lines("a\u{2028}b\x0cc\u{85}d\u{2029}e\x1cf"),
        vec!["a", "b", "c", "d", "e", "f"]
    );
}

// --- RunSummary ---

#[test]
fn test_summary_from_outcomes() {
    let outcomes = vec![
        PairOutcome::Success,
        PairOutcome::ReadFailure("nope".into()),
        PairOutcome::Success,
        PairOutcome::WriteFailure("locked".into()),
    ];
    let summary = RunSummary::from_outcomes(&outcomes);
    assert_eq!(
        summary,
        RunSummary {
            total: 4,
            succeeded: 2,
            failed: 2
        }
    );
    assert_eq!(summary.succeeded + summary.failed, summary.total);
    assert!(!summary.all_succeeded());
}

#[test]
fn test_summary_display() {
    let summary = RunSummary::from_outcomes(&[PairOutcome::Success]);
    assert_eq!(
        summary.to_string(),
        "Total pairs: 1, Successfully processed: 1, Failed to process: 0"
    );
}

// --- prompt answers ---

#[test]
fn test_parse_answer_help_tokens() {
    assert_eq!(parse_answer("help\n"), Answer::Help);
    assert_eq!(parse_answer("  HeLp "), Answer::Help);
    assert_eq!(parse_answer("?"), Answer::Help);
}

#[test]
fn test_parse_answer_path_is_trimmed() {
    assert_eq!(
        parse_answer("  /tmp/photos \n"),
        Answer::Path(PathBuf::from("/tmp/photos"))
    );
}

// --- .xmpair.toml ---

#[test]
fn test_toml_applies_present_fields_only() {
    let file = parse_xmpair_toml("[settings]\ndry_run = true\nreport = \"out.json\"\n").unwrap();
    let mut opts = Opts {
        verbose: true,
        ..Default::default()
    };
    apply_file_to_opts(&file, &PathBuf::from("/photos"), &mut opts);
    assert!(opts.verbose);
    assert!(opts.dry_run);
    assert!(!opts.pause);
    assert_eq!(opts.report_path, Some(PathBuf::from("/photos/out.json")));
}

#[test]
fn test_toml_empty_file_is_valid() {
    let file = parse_xmpair_toml("").unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &PathBuf::from("/photos"), &mut opts);
    assert!(!opts.dry_run);
    assert_eq!(opts.report_path, None);
}
