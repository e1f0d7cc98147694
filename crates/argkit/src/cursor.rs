/// Forward-only view over the tokens of one parse.
#[derive(Debug, Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [String],
    pos: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn has_more(&self) -> bool {
        self.pos < self.tokens.len()
    }

    /// Current token, without consuming it.
    pub fn peek(&self) -> Option<&'t str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    pub fn take(&mut self) -> Option<&'t str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Tokens not consumed yet.
    pub fn remaining(&self) -> &'t [String] {
        &self.tokens[self.pos..]
    }
}
