use crate::error::ReleaseNotesError;

use super::*;

const REPO_URL: &str = "https://github.com/osquery/osquery";
const PULL_BASE: &str = "https://github.com/osquery/osquery/pull";

fn commit(
    pr_number: u64,
    title: &str,
    labels: &[&str],
    authors: &[&str],
) -> Commit {
    Commit {
        sha: format!("sha{pr_number}"),
        message_headline: title.into(),
        timestamp: "2024-02-01T00:00:00Z".into(),
        pr_number,
        pr_title: title.into(),
        pr_labels: labels.iter().map(|l| l.to_string()).collect(),
        authors: authors.iter().map(|a| a.to_string()).collect(),
    }
}

fn missing_pr(sha: &str, headline: &str) -> Commit {
    Commit {
        sha: sha.into(),
        message_headline: headline.into(),
        timestamp: "2024-02-01T00:00:00Z".into(),
        pr_number: 0,
        pr_title: format!("{headline} (MISSING PR for commit {sha})"),
        pr_labels: BTreeSet::new(),
        authors: BTreeSet::new(),
    }
}

fn config() -> RenderConfig {
    RenderConfig {
        repo_url: REPO_URL.into(),
        pull_url_base: PULL_BASE.into(),
        ..RenderConfig::default()
    }
}

fn renderer() -> Renderer {
    Renderer::new(config(), Classifier::default())
}

fn versions() -> ReleaseVersions {
    ReleaseVersions {
        last: "5.10.2".into(),
        new: "5.11.0".into(),
    }
}

fn line(pr: u64, title: &str) -> String {
    format!("- {title} ([#{pr}]({PULL_BASE}/{pr}))")
}

#[test]
fn renders_end_to_end_scenario() {
    let commits = vec![
        commit(42, "Already released", &[], &["alice"]),
        commit(43, "Fix crash", &[], &["bob"]),
        commit(44, "Update docs", &["documentation"], &["carol"]),
    ];
    let seen = SeenPrs::from_iter([42]);

    let output = renderer().render(&commits, &seen, &versions()).unwrap();

    let todo = output.find("### FIXME: Please Categorize").unwrap();
    let docs = output.find("### Documentation").unwrap();
    let fix_line = output.find(&line(43, "Fix crash")).unwrap();
    let docs_line = output.find(&line(44, "Update docs")).unwrap();

    assert!(todo < fix_line && fix_line < docs);
    assert!(docs < docs_line);
    assert!(!output.contains("#42"));
    assert!(!output.contains("Already released"));
}

#[test]
fn renders_header_links() {
    let output = renderer()
        .render(&[], &SeenPrs::default(), &versions())
        .unwrap();

    assert!(output.contains(r#"<a name="5.11.0"></a>"#));
    assert!(output.contains(&format!(
        "## [5.11.0]({REPO_URL}/releases/tag/5.11.0)"
    )));
    assert!(output.contains(&format!(
        "[Git Commits]({REPO_URL}/compare/5.10.2...5.11.0)"
    )));
}

#[test]
fn section_order_ignores_input_order() {
    let commits = vec![
        commit(2, "Docs first", &["documentation"], &[]),
        commit(1, "Uncategorized second", &[], &[]),
    ];

    let output = renderer()
        .render(&commits, &SeenPrs::default(), &versions())
        .unwrap();

    let uncategorized = output.find("Uncategorized second").unwrap();
    let docs = output.find("Docs first").unwrap();

    assert!(uncategorized < docs);
}

#[test]
fn keeps_encounter_order_within_section() {
    let commits = vec![
        commit(9, "Ninth", &[], &[]),
        commit(3, "Third", &[], &[]),
        commit(5, "Fifth", &[], &[]),
    ];

    let grouped = renderer().group(&commits, &SeenPrs::default());

    assert_eq!(
        grouped[&Section::ToFix],
        vec![
            format!("Ninth ([#9]({PULL_BASE}/9))"),
            format!("Third ([#3]({PULL_BASE}/3))"),
            format!("Fifth ([#5]({PULL_BASE}/5))"),
        ]
    );
}

#[test]
fn suppresses_repeats_within_the_same_run() {
    let commits = vec![
        commit(7, "Rebased PR", &[], &[]),
        commit(7, "Rebased PR", &[], &[]),
    ];

    let grouped = renderer().group(&commits, &SeenPrs::default());

    assert_eq!(grouped[&Section::ToFix].len(), 1);
}

#[test]
fn keeps_every_commit_without_pull_request() {
    let commits = vec![
        missing_pr("aaa", "Direct push"),
        missing_pr("bbb", "Another direct push"),
    ];

    let output = renderer()
        .render(&commits, &SeenPrs::default(), &versions())
        .unwrap();

    assert!(output.contains("Direct push (MISSING PR for commit aaa) ([#0]"));
    assert!(
        output.contains("Another direct push (MISSING PR for commit bbb) ([#0]")
    );
}

#[test]
fn does_not_mutate_seen_set() {
    let commits = vec![commit(43, "Fix crash", &[], &[])];
    let seen = SeenPrs::from_iter([42]);

    renderer().render(&commits, &seen, &versions()).unwrap();

    assert_eq!(seen, SeenPrs::from_iter([42]));
}

#[test]
fn rendering_is_idempotent() {
    let commits = vec![
        commit(43, "Fix crash", &[], &["bob", "alice"]),
        commit(44, "Update docs", &["documentation"], &["carol"]),
        missing_pr("ccc", "Direct push"),
    ];
    let seen = SeenPrs::from_iter([1, 2, 3]);
    let renderer = renderer();

    let first = renderer.render(&commits, &seen, &versions()).unwrap();
    let second = renderer.render(&commits, &seen, &versions()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn counts_distinct_authors() {
    let commits = vec![
        commit(1, "One", &[], &["shared", "first-only"]),
        commit(2, "Two", &[], &["shared", "second-only"]),
    ];

    assert_eq!(count_authors(&commits), 3);

    let output = renderer()
        .render(&commits, &SeenPrs::default(), &versions())
        .unwrap();

    assert!(output.contains(
        "Representing commits from 3 contributors! Thank you all."
    ));
}

#[test]
fn counts_authors_of_already_published_commits() {
    let commits = vec![
        commit(42, "Published", &[], &["alice"]),
        commit(43, "New", &[], &["bob"]),
    ];
    let seen = SeenPrs::from_iter([42]);

    let output = renderer().render(&commits, &seen, &versions()).unwrap();

    assert!(output.contains("from 2 contributors"));
}

#[test]
fn hides_contributor_sentence_when_disabled() {
    let renderer = Renderer::new(
        RenderConfig {
            show_contributors: false,
            ..config()
        },
        Classifier::default(),
    );

    let output = renderer
        .render(&[], &SeenPrs::default(), &versions())
        .unwrap();

    assert!(!output.contains("contributors"));
}

#[test]
fn renders_bare_headers_for_empty_sections() {
    let output = renderer()
        .render(&[], &SeenPrs::default(), &versions())
        .unwrap();

    for section in Section::ordered() {
        assert!(output.contains(&format!("### {section}\n")));
    }
}

#[test]
fn skips_empty_sections_when_configured() {
    let renderer = Renderer::new(
        RenderConfig {
            skip_empty_sections: true,
            ..config()
        },
        Classifier::default(),
    );
    let commits = vec![commit(44, "Update docs", &["documentation"], &[])];

    let output = renderer
        .render(&commits, &SeenPrs::default(), &versions())
        .unwrap();

    assert!(output.contains("### Documentation"));
    assert!(!output.contains("### Bug Fixes"));
    assert!(!output.contains("### FIXME: Please Categorize"));
}

#[test]
fn supports_custom_template() {
    let renderer = Renderer::new(
        RenderConfig {
            template: concat!(
                "{{ last_version }}->{{ new_version }}|",
                "{% for s in sections %}",
                "{{ s.name }}={{ s.lines | length }};",
                "{% endfor %}"
            )
            .into(),
            skip_empty_sections: true,
            ..config()
        },
        Classifier::default(),
    );
    let commits = vec![
        commit(1, "One", &[], &[]),
        commit(2, "Two", &["documentation"], &[]),
        commit(3, "Three", &["documentation"], &[]),
    ];

    let output = renderer
        .render(&commits, &SeenPrs::default(), &versions())
        .unwrap();

    assert_eq!(
        output,
        "5.10.2->5.11.0|FIXME: Please Categorize=1;Documentation=2;"
    );
}

#[test]
fn invalid_template_is_template_error() {
    let renderer = Renderer::new(
        RenderConfig {
            template: "{% for x in %}".into(),
            ..config()
        },
        Classifier::default(),
    );

    let err = renderer
        .render(&[], &SeenPrs::default(), &versions())
        .unwrap_err();

    assert!(matches!(err, ReleaseNotesError::TemplateError(_)));
}

#[test]
fn write_to_emits_rendered_output() {
    let commits = vec![commit(43, "Fix crash", &[], &[])];
    let renderer = renderer();
    let mut out: Vec<u8> = vec![];

    renderer
        .write_to(&mut out, &commits, &SeenPrs::default(), &versions())
        .unwrap();

    let expected = renderer
        .render(&commits, &SeenPrs::default(), &versions())
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn formats_counts_with_separators() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1000), "1,000");
    assert_eq!(format_count(1234567), "1,234,567");
}
