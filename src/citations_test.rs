use super::*;

fn link(uri: &str, title: &str) -> GroundingLink {
    GroundingLink { uri: uri.into(), title: title.into() }
}

#[test]
fn dedupe_keeps_first_occurrence_in_order() {
    let links = vec![
        link("https://a.example", "First A"),
        link("https://b.example", "B"),
        link("https://a.example", "Second A"),
        link("https://c.example", "C"),
        link("https://b.example", "B again"),
    ];
    let deduped = dedupe_by_uri(&links);
    let pairs: Vec<(&str, &str)> = deduped.iter().map(|l| (l.uri.as_str(), l.title.as_str())).collect();
    assert_eq!(
        pairs,
        [("https://a.example", "First A"), ("https://b.example", "B"), ("https://c.example", "C")]
    );
}

#[test]
fn dedupe_empty_is_empty() {
    assert!(dedupe_by_uri(&[]).is_empty());
}

#[test]
fn label_cuts_at_pipe_and_trims() {
    assert_eq!(display_label("  From Devices to Data  | Nicholas Pacl"), "From Devices to Data");
}

#[test]
fn label_truncates_to_28_chars() {
    let label = display_label("An Extremely Long Article Title About Fleets");
    assert_eq!(label.chars().count(), LABEL_MAX_CHARS);
    assert_eq!(label, "An Extremely Long Article Ti");
}

#[test]
fn label_truncation_is_char_based() {
    let title = "é".repeat(40);
    let label = display_label(&title);
    assert_eq!(label.chars().count(), LABEL_MAX_CHARS);
}

#[test]
fn label_of_pipe_only_title_is_empty() {
    assert_eq!(display_label("| suffix"), "");
}

#[test]
fn citations_carry_uri_title_and_label() {
    let links = vec![link("https://nicholaspacl.com/x", "Devices | Blog"), link("https://nicholaspacl.com/x", "dup")];
    let citations = citations_for(&links);
    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].uri, "https://nicholaspacl.com/x");
    assert_eq!(citations[0].title, "Devices | Blog");
    assert_eq!(citations[0].label, "Devices");
}
