// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label measurement and greedy word wrapping.

use hashbrown::HashMap;

/// Horizontal advance of single characters at a fixed font size.
pub trait TextMeasure {
    /// Advance of `ch`.
    fn advance(&mut self, ch: char) -> f64;

    /// Sum of the advances of every character in `text`.
    fn measure(&mut self, text: &str) -> f64 {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}

/// Every character has the same advance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedAdvance(pub f64);

impl TextMeasure for FixedAdvance {
    fn advance(&mut self, _: char) -> f64 {
        self.0
    }
}

/// Memoizes per-character advances of another measurer.
#[derive(Clone, Debug)]
pub struct CharWidthCache<M> {
    inner: M,
    widths: HashMap<char, f64>,
    misses: usize,
}

impl<M: TextMeasure> CharWidthCache<M> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            widths: HashMap::new(),
            misses: 0,
        }
    }

    /// Number of distinct characters measured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Returns `true` if nothing was measured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Calls that reached the wrapped measurer.
    #[must_use]
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// The wrapped measurer.
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: TextMeasure> TextMeasure for CharWidthCache<M> {
    fn advance(&mut self, ch: char) -> f64 {
        if let Some(&w) = self.widths.get(&ch) {
            return w;
        }
        self.misses += 1;
        let w = self.inner.advance(ch);
        self.widths.insert(ch, w);
        w
    }
}

/// Lines of a wrapped label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrappedLabel {
    /// Lines to draw, at most the line budget.
    pub lines: Vec<String>,
    /// `true` if words were dropped to stay within the budget.
    pub truncated: bool,
}

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Words are split on whitespace and joined by single spaces. A word wider
/// than `max_width` gets a line of its own and is clipped when drawn. Lines
/// beyond `max_lines` are dropped.
pub fn wrap_label<M>(text: &str, max_width: f64, max_lines: usize, measure: &mut M) -> WrappedLabel
where
    M: TextMeasure + ?Sized,
{
    let mut out = WrappedLabel::default();
    if max_lines == 0 {
        out.truncated = text.split_whitespace().next().is_some();
        return out;
    }
    let space = measure.advance(' ');
    let mut line = String::new();
    let mut width = 0.0;
    for word in text.split_whitespace() {
        let w = measure.measure(word);
        if line.is_empty() {
            line.push_str(word);
            width = w;
            continue;
        }
        if width + space + w <= max_width {
            line.push(' ');
            line.push_str(word);
            width += space + w;
            continue;
        }
        out.lines.push(core::mem::take(&mut line));
        if out.lines.len() == max_lines {
            out.truncated = true;
            return out;
        }
        line.push_str(word);
        width = w;
    }
    if !line.is_empty() {
        out.lines.push(line);
    }
    out
}
