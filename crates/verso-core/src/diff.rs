//! Line diffs between two snapshots of a file.
//!
//! Lines are compared as raw bytes with their terminators kept, so a CRLF to
//! LF change, a dropped final newline, or a change in non-UTF-8 bytes is
//! always a visible edit. Text is decoded (lossily) only for display. A
//! [`FileDiff`] keeps the edit script and both sides; [`FileDiff::lines`]
//! replays it as add/remove/context lines and can be called any number of
//! times.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffTag};

/// What kind of diff operation on a line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineOp {
    /// Line exists only in the "after" version.
    Add,
    /// Line exists only in the "before" version.
    Remove,
    /// Line is identical in both versions.
    Context,
}

/// A single line within a diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiffLine {
    pub op: LineOp,
    /// Display text without the trailing `\n`. A `\r` before it is kept.
    pub content: String,
    /// The line is the last in its file and has no terminating newline.
    pub missing_newline: bool,
    /// 1-based line number in the old file (None for Add lines).
    pub old_lineno: Option<usize>,
    /// 1-based line number in the new file (None for Remove lines).
    pub new_lineno: Option<usize>,
}

/// A contiguous block of changes within a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffHunk {
    /// Starting line in the old file (1-based).
    pub old_start: usize,
    /// Number of lines from the old file in this hunk.
    pub old_count: usize,
    /// Starting line in the new file (1-based).
    pub new_start: usize,
    /// Number of lines from the new file in this hunk.
    pub new_count: usize,
    /// The individual diff lines.
    pub lines: Vec<DiffLine>,
}

/// Returns true if the data appears to be binary (contains null byte in first 8KB).
pub fn is_binary(data: &[u8]) -> bool {
    let check_len = data.len().min(8192);
    data[..check_len].contains(&0)
}

/// Edit operation over line indices.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EditOp {
    Equal(usize, usize), // old_idx, new_idx
    Insert(usize),       // new_idx
    Delete(usize),       // old_idx
}

/// Split into lines, each keeping its `\n` (the last may have none).
fn split_lines(data: &[u8]) -> Vec<Vec<u8>> {
    data.split_inclusive(|b| *b == b'\n')
        .map(<[u8]>::to_vec)
        .collect()
}

/// Myers edit script, flattened to one op per line.
fn edit_script(old: &[Vec<u8>], new: &[Vec<u8>]) -> Vec<EditOp> {
    let mut ops = Vec::with_capacity(old.len().max(new.len()));
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                ops.extend(old_range.zip(new_range).map(|(o, n)| EditOp::Equal(o, n)));
            }
            DiffTag::Delete => ops.extend(old_range.map(EditOp::Delete)),
            DiffTag::Insert => ops.extend(new_range.map(EditOp::Insert)),
            DiffTag::Replace => {
                ops.extend(old_range.map(EditOp::Delete));
                ops.extend(new_range.map(EditOp::Insert));
            }
        }
    }
    ops
}

/// The comparison of two snapshots of one file.
#[derive(Debug, Clone)]
pub struct FileDiff {
    /// Path of the file, relative to the working-tree root.
    pub path: String,
    /// What the "before" side is (a version id, or "working tree").
    pub old_label: String,
    /// What the "after" side is.
    pub new_label: String,
    /// True if either side looks binary; binary diffs carry no lines.
    pub is_binary: bool,
    identical: bool,
    old_lines: Vec<Vec<u8>>,
    new_lines: Vec<Vec<u8>>,
    ops: Vec<EditOp>,
}

impl FileDiff {
    /// Diff two byte buffers line by line.
    pub fn compute(
        path: &str,
        old_label: &str,
        new_label: &str,
        old_bytes: &[u8],
        new_bytes: &[u8],
    ) -> Self {
        let is_binary = is_binary(old_bytes) || is_binary(new_bytes);
        let (old_lines, new_lines, ops) = if is_binary {
            (Vec::new(), Vec::new(), Vec::new())
        } else {
            let old_lines = split_lines(old_bytes);
            let new_lines = split_lines(new_bytes);
            let ops = edit_script(&old_lines, &new_lines);
            (old_lines, new_lines, ops)
        };

        Self {
            path: path.to_string(),
            old_label: old_label.to_string(),
            new_label: new_label.to_string(),
            is_binary,
            identical: old_bytes == new_bytes,
            old_lines,
            new_lines,
            ops,
        }
    }

    /// Every line of the comparison, in order. Nothing is materialized up front.
    pub fn lines(&self) -> impl Iterator<Item = DiffLine> + '_ {
        self.ops.iter().map(move |op| match *op {
            EditOp::Equal(oi, ni) => {
                let (content, missing_newline) = display(&self.old_lines[oi]);
                DiffLine {
                    op: LineOp::Context,
                    content,
                    missing_newline,
                    old_lineno: Some(oi + 1),
                    new_lineno: Some(ni + 1),
                }
            }
            EditOp::Delete(oi) => {
                let (content, missing_newline) = display(&self.old_lines[oi]);
                DiffLine {
                    op: LineOp::Remove,
                    content,
                    missing_newline,
                    old_lineno: Some(oi + 1),
                    new_lineno: None,
                }
            }
            EditOp::Insert(ni) => {
                let (content, missing_newline) = display(&self.new_lines[ni]);
                DiffLine {
                    op: LineOp::Add,
                    content,
                    missing_newline,
                    old_lineno: None,
                    new_lineno: Some(ni + 1),
                }
            }
        })
    }

    /// Lines added.
    pub fn additions(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, EditOp::Insert(_))).count()
    }

    /// Lines removed.
    pub fn deletions(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, EditOp::Delete(_))).count()
    }

    /// True if both sides hold exactly the same bytes.
    pub fn is_unchanged(&self) -> bool {
        self.identical
    }

    /// Group the changes into hunks with `context_lines` of surrounding context.
    pub fn hunks(&self, context_lines: usize) -> Vec<DiffHunk> {
        let lines: Vec<DiffLine> = self.lines().collect();
        group_into_hunks(&lines, context_lines)
    }

    /// Render as a unified diff.
    pub fn render(&self, context_lines: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "--- a/{}\t({})", self.path, self.old_label);
        let _ = writeln!(out, "+++ b/{}\t({})", self.path, self.new_label);
        if self.is_binary {
            if !self.identical {
                out.push_str("Binary files differ\n");
            }
            return out;
        }
        for hunk in self.hunks(context_lines) {
            let _ = writeln!(
                out,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            );
            for line in &hunk.lines {
                let marker = match line.op {
                    LineOp::Add => '+',
                    LineOp::Remove => '-',
                    LineOp::Context => ' ',
                };
                let _ = writeln!(out, "{marker}{}", line.content);
                if line.missing_newline {
                    out.push_str("\\ No newline at end of file\n");
                }
            }
        }
        out
    }
}

fn display(line: &[u8]) -> (String, bool) {
    match line.strip_suffix(b"\n") {
        Some(body) => (String::from_utf8_lossy(body).into_owned(), false),
        None => (String::from_utf8_lossy(line).into_owned(), true),
    }
}

/// Group diff lines into hunks, including context lines around changes.
fn group_into_hunks(tagged: &[DiffLine], context_lines: usize) -> Vec<DiffHunk> {
    // Find indices of changed lines
    let change_indices: Vec<usize> = tagged
        .iter()
        .enumerate()
        .filter(|(_, line)| line.op != LineOp::Context)
        .map(|(i, _)| i)
        .collect();

    if change_indices.is_empty() {
        return Vec::new();
    }

    // Build ranges: each change gets context_lines before and after
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &ci in &change_indices {
        let start = ci.saturating_sub(context_lines);
        let end = (ci + context_lines + 1).min(tagged.len());
        if let Some(last) = ranges.last_mut() {
            if start <= last.1 {
                last.1 = end; // merge overlapping ranges
            } else {
                ranges.push((start, end));
            }
        } else {
            ranges.push((start, end));
        }
    }

    let mut hunks = Vec::new();
    for (start, end) in ranges {
        let lines = tagged[start..end].to_vec();
        let old_count = lines.iter().filter(|l| l.op != LineOp::Add).count();
        let new_count = lines.iter().filter(|l| l.op != LineOp::Remove).count();
        let old_start = first_lineno(&tagged[..end], start, |l| l.old_lineno);
        let new_start = first_lineno(&tagged[..end], start, |l| l.new_lineno);

        hunks.push(DiffHunk {
            old_start,
            old_count,
            new_start,
            new_count,
            lines,
        });
    }

    hunks
}

/// Starting line number of a hunk on one side.
///
/// Uses the first line in the hunk that exists on that side. If the hunk has
/// no such line (pure insertion or deletion), it sits right after the last
/// preceding line on that side, or at 0 for an empty file.
fn first_lineno(
    lines: &[DiffLine],
    start: usize,
    side: impl Fn(&DiffLine) -> Option<usize>,
) -> usize {
    if let Some(n) = lines[start..].iter().find_map(&side) {
        return n;
    }
    lines[..start].iter().rev().find_map(&side).map_or(0, |n| n + 1)
}
