/*
 *  wrap.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

const TAB_STOP: usize = 8;

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_letter(c: char) -> bool {
    is_word(c) && !c.is_numeric()
}

fn is_word_punct(c: char) -> bool {
    is_word(c) || matches!(c, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

/// Tabs out to the next tab stop, any other ASCII whitespace to one space.
fn munge(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut col = 0usize;
    for c in text.chars() {
        match c {
            '\t' => {
                let n = TAB_STOP - col % TAB_STOP;
                out.resize(out.len() + n, ' ');
                col += n;
            }
            '\n' | '\r' => {
                out.push(' ');
                col = 0;
            }
            ' ' | '\x0b' | '\x0c' => {
                out.push(' ');
                col += 1;
            }
            c => {
                out.push(c);
                col += 1;
            }
        }
    }
    out
}

/// Two or more hyphens starting at `at`, then a word character.
fn dash_run_before_word(cs: &[char], at: usize) -> bool {
    let run = cs[at..].iter().take_while(|&&c| c == '-').count();
    run >= 2 && cs.get(at + run).is_some_and(|&c| is_word(c))
}

/// The hyphen at `at` ends one part of a hyphenated word ("long-" of "long-running").
fn hyphen_break(cs: &[char], at: usize) -> bool {
    let letter = |i: usize| cs.get(i).is_some_and(|&c| is_letter(c));
    let dash = |i: usize| cs.get(i) == Some(&'-');
    if !dash(at) {
        return false;
    }
    let behind = (at >= 2 && letter(at - 2) && letter(at - 1))
        || (at >= 3 && letter(at - 3) && dash(at - 2) && letter(at - 1));
    behind && letter(at + 1) && (letter(at + 2) || (dash(at + 2) && letter(at + 3)))
}

/// Split into chunks a line may break between: whitespace runs, words,
/// hyphenated word parts and em-dash runs.
fn split_chunks(cs: &[char]) -> Vec<Vec<char>> {
    let n = cs.len();
    let mut chunks = Vec::new();
    let mut i = 0;
    while i < n {
        let mut j = i;
        if cs[i] == ' ' {
            while j < n && cs[j] == ' ' {
                j += 1;
            }
        } else if i > 0 && is_word_punct(cs[i - 1]) && dash_run_before_word(cs, i) {
            while cs[j] == '-' {
                j += 1;
            }
        } else {
            j = i + 1;
            loop {
                if hyphen_break(cs, j) {
                    j += 1;
                    break;
                }
                if j == n || cs[j] == ' ' {
                    break;
                }
                if is_word_punct(cs[j - 1]) && dash_run_before_word(cs, j) {
                    break;
                }
                j += 1;
            }
        }
        chunks.push(cs[i..j].to_vec());
        i = j;
    }
    chunks
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|&c| c == ' ')
}

/// Greedy wrap to at most `width` characters per line.
///
/// Lines break between words or after the hyphen of a hyphenated word.
/// Whitespace inside a line is kept as written, whitespace at a line break
/// is dropped. A word too long for any line fills the rest of the current
/// line and carries on in `width` sized pieces, split after its last
/// hyphen when one fits.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut pending = split_chunks(&munge(text));
    pending.reverse();
    let mut lines: Vec<String> = Vec::new();

    while !pending.is_empty() {
        let mut line: Vec<Vec<char>> = Vec::new();
        let mut len = 0usize;

        if !lines.is_empty() && pending.last().is_some_and(|c| is_blank(c)) {
            pending.pop();
        }

        while let Some(chunk) = pending.last() {
            if len + chunk.len() > width {
                break;
            }
            len += chunk.len();
            line.extend(pending.pop());
        }

        if let Some(chunk) = pending.last_mut() {
            if chunk.len() > width {
                let space = width - len;
                let mut end = space;
                if let Some(h) = chunk[..space].iter().rposition(|&c| c == '-') {
                    if h > 0 && chunk[..h].iter().any(|&c| c != '-') {
                        end = h + 1;
                    }
                }
                let rest = chunk.split_off(end);
                line.push(std::mem::replace(chunk, rest));
            }
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.concat().into_iter().collect());
        }
    }
    lines
}
