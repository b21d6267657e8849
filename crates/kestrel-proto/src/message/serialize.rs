use std::fmt::{self, Display, Formatter};

use super::types::Message;

/// Whether the final parameter must be written with the `:` marker.
fn needs_long_form(param: &str) -> bool {
    param.is_empty() || param.contains(' ') || param.starts_with(':')
}

impl Display for Message {
    /// Writes the wire line without its terminator.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        write!(f, "{}", self.command)?;

        if let Some((last, middle)) = self.params.split_last() {
            // Empty middles have no wire form.
            for param in middle.iter().filter(|p| !p.is_empty()) {
                write!(f, " {}", param)?;
            }

            if needs_long_form(last) {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }

        Ok(())
    }
}
