//! Minimal PGN reading for archive blocks.
//!
//! Only the tag pairs and the mainline SAN tokens are kept. Variations are
//! skipped and comments such as `{[%clk 0:02:59.9]}` are ignored.

use std::collections::HashMap;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGame {
    pub headers: HashMap<String, String>,
    pub moves: Vec<String>,
}

impl ParsedGame {
    /// Header value, `None` when the tag is absent or blank.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

struct GameCollector;

impl Visitor for GameCollector {
    type Tags = HashMap<String, String>;
    type Movetext = ParsedGame;
    type Output = ParsedGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(HashMap::new())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let key = String::from_utf8_lossy(key).into_owned();
        // first occurrence wins on duplicate tags
        tags.entry(key)
            .or_insert_with(|| String::from_utf8_lossy(&value.decode()).into_owned());
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(ParsedGame {
            headers: tags,
            moves: Vec::with_capacity(96),
        })
    }

    fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        movetext.moves.push(san.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        movetext
    }
}

/// Parses the first game found in `block`. Returns `None` for blank input or
/// anything the reader cannot make sense of.
pub fn parse_block(block: &str) -> Option<ParsedGame> {
    if block.trim().is_empty() {
        return None;
    }

    let mut reader = Reader::new(block.as_bytes());
    match reader.read_game(&mut GameCollector) {
        Ok(game) => game,
        Err(err) => {
            trace!("pgn block unreadable: {err}");
            None
        }
    }
}
