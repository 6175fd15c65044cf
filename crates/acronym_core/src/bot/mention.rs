//! Answers to `@bot TERM` mentions.

use crate::bot::BotResult;
use crate::format;
use crate::repo::acronym_repo::AcronymRepository;
use once_cell::sync::Lazy;
use regex::Regex;

static USER_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<@[^>]+>").expect("valid user mention regex"));

/// Removes `<@U…>` markup and surrounding whitespace.
pub fn strip_mentions(text: &str) -> String {
    USER_MENTION_RE.replace_all(text, "").trim().to_string()
}

/// Builds the channel reply for a mention.
pub fn answer_mention<R>(repo: &R, text: &str) -> BotResult<String>
where
    R: AcronymRepository + ?Sized,
{
    let term = strip_mentions(text);
    if term.is_empty() {
        return Ok(format::mention_help());
    }
    let expansions = repo.lookup(&term)?;
    Ok(format::format_lookup(&term, &expansions))
}

#[cfg(test)]
mod tests {
    use super::strip_mentions;

    #[test]
    fn strip_mentions_removes_every_user_reference() {
        assert_eq!(strip_mentions("<@U123> ato"), "ato");
        assert_eq!(strip_mentions(" <@U1|bot>  <@U2> "), "");
    }
}
