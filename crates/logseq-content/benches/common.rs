// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_outline(blocks: usize) -> String {
    let base = "- TODO Review [[Project Plan]] with #team\n  id:: 64f1c2aa-0000-4000-8000-000000000000\n  - Notes from **Monday**, see ((64f1c2aa-0000-4000-8000-000000000001))\n    - Follow up on https://example.com/tickets\n  - {{query (and [[Project Plan]] (task TODO))}}\n";
    base.repeat(blocks)
}

#[allow(dead_code)]
pub fn generate_journal(days: usize) -> String {
    let mut content = String::new();
    for day in 0..days {
        content.push_str(&format!("- Day {day}\n"));
        content.push_str("  :LOGBOOK:\n  CLOCK: [2024-01-01 Mon 09:00]--[2024-01-01 Mon 10:00] =>  01:00:00\n  :END:\n");
        content.push_str("  ```rust\n  fn example() {}\n  ```\n");
        content.push_str("  > quoted *thought*\n");
    }
    content
}
