//! Frame storyboards for the trailer and the CLI simulation.
//!
//! Storyboards are plain frame lists. Numbering and rendering happen later,
//! in the render crate's frame sequence.

use cinema_model::analysis::ReleaseAnalysis;
use cinema_model::frame::Frame;

/// Lines shown on the highlights, contributors, and changed-areas cards.
pub const CARD_LIST_LIMIT: usize = 5;

/// Characters revealed per typing frame.
pub const TYPING_STRIDE: usize = 2;
pub const CURSOR_GLYPH: char = '_';
pub const PROMPT: &str = "$ ";

/// Identical frames per pipeline status screen.
pub const HOLD_FRAMES: usize = 8;
pub const PIPELINE_HEADER: &str = "# GitHub Actions";

/// Pipeline steps shown after the commands are typed, with the word
/// used once each finishes.
pub const PIPELINE_STEPS: [(&str, &str); 4] = [
    ("build", "passed"),
    ("test", "passed"),
    ("publish release", "done"),
    ("attach trailer", "done"),
];

/// The five trailer cards, in order.
///
/// `generated_at` is printed on the closing card.
pub fn trailer_storyboard(analysis: &ReleaseAnalysis, generated_at: &str) -> Vec<Frame> {
    let summary = Frame::card(
        "RELEASE CINEMA",
        [
            format!("Range: {} → {}", analysis.range.from, analysis.range.to),
            String::new(),
            format!(
                "Commits: {}    Files changed: {}",
                analysis.stats.commits, analysis.stats.files
            ),
        ],
    );

    let highlights = or_placeholder(
        analysis
            .top_commits
            .iter()
            .take(CARD_LIST_LIMIT)
            .map(|c| format!("• {} — {} ({})", c.sha, c.subject, c.author))
            .collect(),
        "• No recent commits",
    );

    let contributors = or_placeholder(
        analysis
            .contributors
            .iter()
            .take(CARD_LIST_LIMIT)
            .map(|c| format!("• {} — {} commit(s)", c.author, c.count))
            .collect(),
        "• —",
    );

    let areas = or_placeholder(
        analysis
            .top_dirs
            .iter()
            .take(CARD_LIST_LIMIT)
            .map(|d| format!("• {} — {} file(s)", d.name, d.count))
            .collect(),
        "• —",
    );

    vec![
        summary,
        Frame::card("HIGHLIGHTS", highlights),
        Frame::card("TOP CONTRIBUTORS", contributors),
        Frame::card("CHANGED AREAS", areas),
        Frame::card(
            "THANKS FOR SHIPPING 🚀",
            ["Made with Release Cinema".to_string(), generated_at.to_string()],
        ),
    ]
}

fn or_placeholder(lines: Vec<String>, placeholder: &str) -> Vec<String> {
    if lines.is_empty() {
        vec![placeholder.to_string()]
    } else {
        lines
    }
}

/// Frames that type `command` after `prompt`.
///
/// One frame per [`TYPING_STRIDE`] characters with a trailing cursor,
/// then the complete line without it. A 10-character command yields
/// prefixes of length 1, 3, 5, 7, 9 and the full 10.
pub fn typing_frames(prompt: &str, command: &str) -> Vec<Frame> {
    let chars: Vec<char> = command.chars().collect();
    let mut frames: Vec<Frame> = (1..=chars.len())
        .step_by(TYPING_STRIDE)
        .map(|typed| {
            let partial: String = chars[..typed].iter().collect();
            Frame::tty(&[format!("{prompt}{partial}{CURSOR_GLYPH}")])
        })
        .collect();
    frames.push(Frame::tty(&[format!("{prompt}{command}")]));
    frames
}

/// The two commands typed in the simulation.
pub fn release_commands(tag: &str) -> [String; 2] {
    [
        format!("git tag -a {tag} -m \"release: {tag}\""),
        format!("git push origin {tag}"),
    ]
}

/// The full CLI simulation: both commands typed out, then a running and
/// a finished hold for each pipeline step.
pub fn simulation_storyboard(tag: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    for command in release_commands(tag) {
        frames.extend(typing_frames(PROMPT, &command));
    }

    for (step, finished) in PIPELINE_STEPS {
        let running = Frame::tty(&[PIPELINE_HEADER.to_string(), format!("• {step} … running")]);
        frames.extend(std::iter::repeat(running).take(HOLD_FRAMES));

        let done = Frame::tty(&[PIPELINE_HEADER.to_string(), format!("✔ {step} … {finished}")]);
        frames.extend(std::iter::repeat(done).take(HOLD_FRAMES));
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinema_model::analysis::{CommitRange, RangeStats};
    use cinema_model::frame::TtyFrame;

    fn tty_text(frame: &Frame) -> &str {
        match frame {
            Frame::Tty(TtyFrame { text }) => text,
            Frame::Card(_) => panic!("expected tty frame"),
        }
    }

    fn empty_analysis() -> ReleaseAnalysis {
        ReleaseAnalysis {
            range: CommitRange::new("v0.1.0", "HEAD"),
            stats: RangeStats {
                commits: 0,
                files: 0,
                dirs: 0,
            },
            top_commits: vec![],
            contributors: vec![],
            top_dirs: vec![],
        }
    }

    #[test]
    fn test_typing_ten_chars_yields_six_frames() {
        let frames = typing_frames("", "0123456789");
        let texts: Vec<&str> = frames.iter().map(tty_text).collect();
        assert_eq!(
            texts,
            vec!["0_", "012_", "01234_", "0123456_", "012345678_", "0123456789"]
        );
    }

    #[test]
    fn test_typing_odd_length_still_ends_with_full_line() {
        let frames = typing_frames(PROMPT, "abc");
        let texts: Vec<&str> = frames.iter().map(tty_text).collect();
        assert_eq!(texts, vec!["$ a_", "$ abc_", "$ abc"]);
    }

    #[test]
    fn test_typing_counts_characters_not_bytes() {
        let frames = typing_frames("", "→→→");
        assert_eq!(tty_text(&frames[0]), "→_");
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_simulation_frame_count_is_deterministic() {
        let [tag_cmd, push_cmd] = release_commands("vX.Y.Z");
        let typed = |s: &str| s.chars().count().div_ceil(TYPING_STRIDE) + 1;
        let expected =
            typed(&tag_cmd) + typed(&push_cmd) + PIPELINE_STEPS.len() * 2 * HOLD_FRAMES;

        assert_eq!(simulation_storyboard("vX.Y.Z").len(), expected);
    }

    #[test]
    fn test_simulation_ends_with_last_step_done() {
        let frames = simulation_storyboard("v2.0.0");
        assert_eq!(
            tty_text(frames.last().unwrap()),
            "# GitHub Actions\n✔ attach trailer … done"
        );
    }

    #[test]
    fn test_checks_pass_and_publishing_is_done() {
        let mut finished: Vec<String> = simulation_storyboard("v2.0.0")
            .iter()
            .map(|frame| tty_text(frame).to_string())
            .filter(|text| text.contains('✔'))
            .collect();
        finished.dedup();
        assert_eq!(
            finished,
            [
                "# GitHub Actions\n✔ build … passed",
                "# GitHub Actions\n✔ test … passed",
                "# GitHub Actions\n✔ publish release … done",
                "# GitHub Actions\n✔ attach trailer … done",
            ]
        );
    }

    #[test]
    fn test_release_commands_embed_tag() {
        let [tag, push] = release_commands("v1.2.3");
        assert_eq!(tag, "git tag -a v1.2.3 -m \"release: v1.2.3\"");
        assert_eq!(push, "git push origin v1.2.3");
    }

    #[test]
    fn test_trailer_placeholders_for_empty_range() {
        let frames = trailer_storyboard(&empty_analysis(), "2024-01-01T00:00:00.000Z");
        assert_eq!(frames.len(), 5);
        assert_eq!(
            frames[1],
            Frame::card("HIGHLIGHTS", ["• No recent commits"])
        );
        assert_eq!(frames[2], Frame::card("TOP CONTRIBUTORS", ["• —"]));
        assert_eq!(frames[3], Frame::card("CHANGED AREAS", ["• —"]));
        assert_eq!(
            frames[4],
            Frame::card(
                "THANKS FOR SHIPPING 🚀",
                ["Made with Release Cinema", "2024-01-01T00:00:00.000Z"]
            )
        );
    }
}
