use crate::error::NlpError;
use crate::nlp::constants;
use crate::types::{Operation, Token, TokenType};

/// Decide the operation from the leading verb and the slots present.
///
/// A leading action selects its operation. Without one the command is a
/// create, but only if it mentions at least one slot; otherwise there is
/// nothing to go on and the command is unclassified.
pub fn classify(tokens: &[Token]) -> Result<Operation, NlpError> {
    let Some(first) = tokens.first() else {
        return Err(NlpError::Unclassified("empty command".to_string()));
    };

    if first.kind == TokenType::Action {
        let operation = constants::action_of(&first.text)
            .ok_or_else(|| NlpError::Unclassified(format!("unknown action '{}'", first.text)))?;
        if tokens.len() == 1 {
            return Err(NlpError::Unclassified(format!(
                "nothing follows '{}'",
                first.text
            )));
        }
        return Ok(operation);
    }

    if tokens.iter().any(|t| t.kind.is_slot()) {
        Ok(Operation::Create)
    } else {
        Err(NlpError::Unclassified("no action and no date, time or other detail".to_string()))
    }
}
