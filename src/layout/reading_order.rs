use crate::core::model::{Line, Position, Token};

/// Flattens a line into tokens: per cluster the base, then the below marks
/// left to right, then the above marks left to right.
pub fn line_tokens(line: &Line) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(line.glyph_count());
    for cluster in &line.clusters {
        tokens.push(Token {
            glyph: cluster.base.clone(),
            role: Position::Base,
        });
        tokens.extend(cluster.below.iter().map(|g| Token {
            glyph: g.clone(),
            role: Position::Below,
        }));
        tokens.extend(cluster.above.iter().map(|g| Token {
            glyph: g.clone(),
            role: Position::Above,
        }));
    }
    tokens
}
