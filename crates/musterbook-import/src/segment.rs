use regex::Regex;

use crate::errors::Result;

/// Kind of block introduced by a section keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Regiment,
    Auxiliary,
}

/// Regiment and auxiliary blocks cut out of an exported list.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Sections<'a> {
    /// One block per `regiment` keyword line, in order of appearance.
    pub regiments: Vec<&'a str>,
    /// The last `auxiliary` block, if any.
    pub auxiliary: Option<&'a str>,
}

/// Splits list text on the `regiment` and `auxiliary` keywords.
///
/// A block starts at the beginning of the line holding its keyword and ends
/// where the next keyword line starts. Text before the first keyword line
/// belongs to no block. A line holding several keywords opens a single block
/// of the first keyword's kind.
#[derive(Debug, Clone)]
pub struct Segmenter {
    keyword: Regex,
}

impl Segmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            keyword: Regex::new(r"(?i)regiment|auxiliary")?,
        })
    }

    pub fn split<'a>(&self, text: &'a str) -> Sections<'a> {
        let mut starts: Vec<(usize, SectionKind)> = Vec::new();
        for found in self.keyword.find_iter(text) {
            let line_start = text[..found.start()]
                .rfind('\n')
                .map(|idx| idx + 1)
                .unwrap_or(0);
            if starts.last().is_some_and(|(start, _)| *start == line_start) {
                continue;
            }
            let kind = if found.as_str().eq_ignore_ascii_case("auxiliary") {
                SectionKind::Auxiliary
            } else {
                SectionKind::Regiment
            };
            starts.push((line_start, kind));
        }

        let mut sections = Sections::default();
        for (idx, (start, kind)) in starts.iter().enumerate() {
            let end = starts
                .get(idx + 1)
                .map(|(next, _)| *next)
                .unwrap_or(text.len());
            let block = &text[*start..end];
            match kind {
                SectionKind::Regiment => sections.regiments.push(block),
                SectionKind::Auxiliary => sections.auxiliary = Some(block),
            }
        }
        sections
    }
}
