//! End-to-end parsing scenarios and idempotence.

use logseq_content::{
    Fragment, PreviousLine, TaskStatus, Tree, debug,
    nodes::build::{
        advanced_command, block, code_block, heading, logbook, logbook_entry, paragraph,
        properties, property, query, task_marker, text,
    },
    parse_string, write_to_string,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn parsed(input: &str) -> String {
    let tree = parse_string(input).unwrap();
    debug(&tree, tree.root())
}

fn built(fragment: Fragment) -> String {
    let tree = Tree::from(fragment);
    debug(&tree, tree.root())
}

#[test]
fn heading_then_paragraph() {
    assert_eq!(
        parsed("# Heading\n\nParagraph"),
        built(block([
            heading(1, [text("Heading")]),
            paragraph([text("Paragraph")]).with_previous_line(PreviousLine::Blank),
        ]))
    );
}

#[test]
fn dash_list_becomes_outline() {
    insta::assert_snapshot!(parsed("- Item 1\n  - Item 1.1\n- Item 2\n"), @r"
    Block{
      children=[
        Block{
          children=[
            Paragraph{
              previousLineType='automatic'
              children=[
                Text{
                  value='Item 1'
                }
              ]
            }
            Block{
              children=[
                Paragraph{
                  previousLineType='automatic'
                  children=[
                    Text{
                      value='Item 1.1'
                    }
                  ]
                }
              ]
            }
          ]
        }
        Block{
          children=[
            Paragraph{
              previousLineType='automatic'
              children=[
                Text{
                  value='Item 2'
                }
              ]
            }
          ]
        }
      ]
    }
    ");
}

#[test]
fn properties_then_body() {
    assert_eq!(
        parsed("key:: value\nBody\n"),
        built(block([
            properties([property("key", [text("value")])]),
            paragraph([text("Body")]).with_previous_line(PreviousLine::NonBlank),
        ]))
    );
}

#[test]
fn query_macro() {
    assert_eq!(
        parsed("{{query datalog}}"),
        built(block([paragraph([query("datalog")])]))
    );
}

#[test]
fn task_marker_is_recognised() {
    assert_eq!(
        parsed("TODO Finish draft"),
        built(block([paragraph([
            task_marker(TaskStatus::Todo),
            text("Finish draft"),
        ])]))
    );
}

#[test]
fn advanced_command_keeps_raw_body() {
    assert_eq!(
        parsed("#+BEGIN_ABC\nraw\n#+END_ABC\n"),
        built(block([advanced_command("ABC", "raw\n")]))
    );
}

#[test]
fn fence_body_starts_after_the_opener() {
    assert_eq!(
        parsed("```\nx\n```"),
        built(block([code_block("", "x")]))
    );
    assert_eq!(
        parsed(":LOGBOOK:\nCLOCK: x\n:END:"),
        built(block([logbook([logbook_entry("CLOCK: x")])]))
    );
}

#[rstest]
#[case("Basic  \ncontent")]
#[case("{{poem red,blue}}")]
#[case("- Item 1\n  - Item 1.1\n- Item 2\n")]
#[case("+ a\n- b\n\ntrailing")]
#[case("Text with *emphasis* and **strong**\n\n> quote\n> more")]
#[case("- a\n  * nested\n  - b\n    key:: v\n-\n- c")]
#[case("#[[unterminated")]
#[case("\\#tag")]
#[case("see \\#tag and \\#[[x]]")]
#[case("#")]
#[case("```\nx\n```")]
#[case(":LOGBOOK:\nCLOCK: x\n:END:")]
#[case("#+BEGIN_QUOTE\nx\n#+END_QUOTE")]
fn reparsing_written_output_is_stable(#[case] input: &str) {
    let first = parse_string(input).unwrap();
    let written = write_to_string(&first, first.root()).unwrap();
    let second = parse_string(&written).unwrap();
    assert_eq!(debug(&second, second.root()), debug(&first, first.root()));
}
