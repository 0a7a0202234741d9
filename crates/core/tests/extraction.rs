//! End-to-end behavior of the extraction pipeline on whole fragments.

use zimtext::{Extractor, Selection, SentenceHeuristic, normalize_whitespace, run_extraction};

const SAMPLE: &str = "<html><body><p>Hello   world.</p><script>ignored();</script><p>Second.</p></body></html>";

fn extract(html: &str, selection: &Selection, budget: usize) -> (usize, Vec<String>) {
	let mut out = Vec::new();
	let written = run_extraction(html.as_bytes(), &mut out, selection, budget).expect("Vec sink never fails");
	let text = String::from_utf8(out).expect("output should be UTF-8");
	(written, text.lines().map(ToString::to_string).collect())
}

fn sentences() -> Selection {
	Selection::SingleSentence(SentenceHeuristic::default())
}

#[test]
fn clean_text_mode_emits_every_paragraph() {
	let (written, lines) = extract(SAMPLE, &Selection::MatchAll, 10);
	assert_eq!(written, 2);
	assert_eq!(lines, vec!["Hello world.", "Second."]);
}

#[test]
fn sentence_mode_keeps_single_sentences() {
	let (written, lines) = extract(SAMPLE, &sentences(), 10);
	assert_eq!(written, 2);
	assert_eq!(lines, vec!["Hello world.", "Second."]);
}

#[test]
fn sentence_mode_rejects_two_sentences() {
	let (written, lines) = extract("<html><body><p>Hello. World.</p></body></html>", &sentences(), 10);
	assert_eq!(written, 0);
	assert!(lines.is_empty());
}

#[test]
fn budget_of_one_stops_after_first_paragraph() {
	let html = "<p>First.</p><p>Second.</p><p>Third.</p>";
	let (written, lines) = extract(html, &Selection::MatchAll, 1);
	assert_eq!(written, 1);
	assert_eq!(lines, vec!["First."]);

	let extractor = Extractor::new(Selection::MatchAll);
	let mut stream = extractor.paragraphs(html.as_bytes());
	stream.next();
	assert_eq!(stream.consumed(), "<p>First.</p>".len());
}

#[test]
fn text_pattern_filters_paragraphs() {
	let selection = Selection::pattern("World").unwrap();
	let (written, lines) = extract("<p>Hello.</p><p>World.</p>", &selection, 10);
	assert_eq!(written, 1);
	assert_eq!(lines, vec!["World."]);
}

#[test]
fn written_count_never_exceeds_budget() {
	let html = "<ul><li>a1</li><li>a2</li><li>a3</li><li>a4</li><li>a5</li></ul>";
	for budget in 0..8 {
		let (written, lines) = extract(html, &Selection::MatchAll, budget);
		assert!(written <= budget);
		assert_eq!(written, lines.len());
		assert_eq!(written, budget.min(5));
	}
}

#[test]
fn markup_never_leaks_from_tag_soup() {
	let soups = [
		"<p>a<b>b<i>c</b>d</i>e</p>",
		"<p>x < y and y > z</p>",
		"<div><p>unclosed<div>nested<span>deep</div>",
		"<p>broken <a href='x>y</p><p>after</p>",
		"<<p>>double<</p>>",
		"<p>&lt;script&gt;alert(1)&lt;/script&gt;</p><p>plain</p>",
		"<p>a</p</p>b<p/c>d</",
		"text <!-- <p>comment</p> --> more <! weird > end",
		"<table><tr><td>1</td><td>2<tr><td>3</table>",
		"< p>spaced</ p><p>ok</p>",
		"<p title=\"a<b>c\">attr</p>",
		"<svg><text>drawn</text></svg><p>visible</p>",
	];
	for soup in soups {
		let (_, lines) = extract(soup, &Selection::MatchAll, 100);
		for line in &lines {
			let open = line.find('<');
			let leaked = open.is_some_and(|at| line[at..].contains('>'));
			assert!(!leaked, "markup leaked from {soup:?}: {line:?}");
		}
	}
}

#[test]
fn excluded_content_never_appears() {
	let cases = [
		"<p>before</p><script>var secret = 1;</script><p>after</p>",
		"<p>before</p><script>var secret = 1;",
		"<p>before</p><STYLE type='text/css'>.secret { }</Style><p>after</p>",
		"<p>before</p><style>.secret { }</p><p>after</p>",
		"<p>before</p><noscript><p>secret fallback</p></noscript>",
		"<html><head><title>secret title</title></head><body><p>before</p></body></html>",
		"<p>before <textarea>secret input</textarea> after</p>",
		"<p>before</p><svg><svg><text>inner</text></svg><text>secret label</text></svg><p>after</p>",
		"<p>before</p><template><template>x</template>secret tpl</template><p>after</p>",
		"<p>before</p><script src=\"a.js\"/>var secret = 1;</script><p>after</p>",
		"<p>before</p><style/>.secret { }</style><p>after</p>",
	];
	for case in cases {
		let (_, lines) = extract(case, &Selection::MatchAll, 100);
		assert!(lines.iter().all(|line| !line.contains("secret")), "excluded text leaked from {case:?}: {lines:?}");
		assert!(lines.iter().any(|line| line.contains("before")), "lost surrounding text in {case:?}");
	}
}

#[test]
fn text_after_nested_exclusions_survives() {
	let html = "<p>before</p><svg><svg><text>inner</text></svg><text>label</text></svg><p>ok</p>";
	let (written, lines) = extract(html, &Selection::MatchAll, 10);
	assert_eq!(written, 2);
	assert_eq!(lines, vec!["before", "ok"]);

	let (_, lines) = extract("<p>before</p><svg/><p>ok</p>", &Selection::MatchAll, 10);
	assert_eq!(lines, vec!["before", "ok"]);
}

#[test]
fn emitted_text_is_already_normalized() {
	let html = "<p>\n  Spaced\t\tout\r\n text&nbsp;&nbsp;here  </p><div> and <em> there </em></div>";
	let (_, lines) = extract(html, &Selection::MatchAll, 10);
	assert_eq!(lines, vec!["Spaced out text here", "and there"]);
	for line in &lines {
		assert_eq!(&normalize_whitespace(line), line);
	}
}

#[test]
fn malformed_input_never_errors() {
	let inputs: [&[u8]; 6] = [b"", b"<", b"&", b"<!--", b"<p", b"\xff\xfe<p>\x80bad</p>"];
	for input in inputs {
		let mut out = Vec::new();
		assert!(run_extraction(input, &mut out, &Selection::MatchAll, 10).is_ok());
	}
}
