//! Parse then write: the output must match the input, apart from the few
//! forms the writer normalises.

use logseq_content::{parse_string, write_to_string};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parse_and_write(input: &str) -> String {
    let tree = parse_string(input).unwrap();
    write_to_string(&tree, tree.root()).unwrap()
}

#[rstest]
// Paragraphs
#[case("Basic content")]
#[case("Basic\ncontent")]
#[case("Basic\\\ncontent")]
#[case("Basic content\n\nMore content")]
// Inline formatting
#[case("**Basic** content")]
#[case("**Basic\ncontent**")]
#[case("**Basic\\\ncontent**")]
#[case("*Basic* content")]
#[case("*Basic\ncontent*")]
#[case("*Basic\\\ncontent*")]
#[case("~~Basic~~ content")]
#[case("~~Basic\ncontent~~")]
#[case("~~Bas~\\~ic~~ content")]
#[case("`Basic` content")]
#[case("`Basic\ncontent`")]
#[case("`Basic  \ncontent`")]
// Headings
#[case("# Heading")]
#[case("### Heading")]
#[case("###### Heading")]
#[case("#")]
#[case("# Heading\n\n##\n\nParagraph")]
#[case("# Heading\n\nParagraph")]
#[case("## Heading\n\nParagraph")]
// Code blocks
#[case("```go\nfunc main() {\n\tfmt.Println(\"Hello world\")\n}\n```")]
#[case("```go\nfunc main() {\n}\n```\n\nParagraph")]
#[case("Paragraph\n\n```go\nfunc main() {\n}\n```")]
#[case("Paragraph\n```go\nfunc main() {\n}\n```")]
#[case("```\nplain\n```")]
#[case("- Item\n  ```\n  indented\n  ```")]
// Macros
#[case("{{poem}}")]
#[case("{{poem red}}")]
#[case("{{poem red, blue}}")]
#[case("{{poem red blue}}")]
#[case("{{poem \"red, blue\"}}")]
#[case("{{poem red blue")]
#[case("{{query (and [[a]] [[b]])}}")]
#[case("{{embed [[Inbox]]}}")]
#[case("{{embed ((64f1-aa))}}")]
// Properties
#[case("key:: value")]
#[case("key:: value\nkey2:: value2")]
#[case("key:: value\nParagraph")]
#[case("Paragraph\nkey:: value")]
#[case("Paragraph\nkey:: value\nParagraph")]
#[case("Paragraph\n\nkey:: value")]
// Tasks
#[case("TODO Task")]
#[case("DOING Task")]
#[case("DONE Task")]
#[case("LATER Task")]
#[case("NOW Task")]
#[case("CANCELLED Task")]
#[case("CANCELED Task")]
#[case("IN-PROGRESS Task")]
#[case("WAIT Task")]
#[case("WAITING Task")]
// References
#[case("See [[Some Page]] and #tag")]
#[case("Tagged #[[with space]]")]
#[case("Refers to ((64f1-aa))")]
#[case("Visit https://example.com today")]
#[case("[a link](https://example.com 'Title')")]
#[case("![alt](image.png)")]
// Block structure
#[case("> quoted")]
#[case("* a\n* b")]
#[case("1. a\n2. b")]
#[case("a\n\n---\n\nb")]
#[case("#+BEGIN_QUOTE\nsaid\n#+END_QUOTE")]
#[case("#+BEGIN_QUERY\n{:title \"x\"}\n#+END_QUERY")]
// Outline
#[case("- Item 1\n- Item 2")]
#[case("- Item 1\n\n  - Item 1.1\n- Item 2")]
#[case("- Title\n  id:: 64b\n  tags:: [[a]], [[b]]")]
#[case("- TODO Task\n  :LOGBOOK:\n  CLOCK: [2023-01-01 Sun 10:00]\n  :END:")]
#[case("- #+BEGIN_QUERY\n  {:title \"x\"}\n  #+END_QUERY")]
fn round_trips(#[case] input: &str) {
    assert_eq!(parse_and_write(input), input);
}

#[rstest]
#[case("Basic  \ncontent", "Basic\\\ncontent")]
#[case("**Basic  \ncontent**", "**Basic\\\ncontent**")]
#[case("*Basic  \ncontent*", "*Basic\\\ncontent*")]
#[case("~~Basic  \ncontent~~", "~~Basic\\\ncontent~~")]
#[case("{{poem red,blue}}", "{{poem red, blue}}")]
#[case(" TODO Task", "TODO Task")]
#[case("- Item 1\n  - Item 1.1\n- Item 2\n", "- Item 1\n\n  - Item 1.1\n- Item 2")]
#[case("#+BEGIN_ABC\nraw\n#+END_ABC\n", "#+BEGIN_ABC\nraw\n#+END_ABC")]
#[case("+ a\n- b", "+ a\n\n- b")]
fn normalises(#[case] input: &str, #[case] output: &str) {
    assert_eq!(parse_and_write(input), output);
}
