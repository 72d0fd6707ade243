//! Locator expressions and the fixed, priority-ordered sets the bot probes.

use std::fmt;

/// An expression identifying zero or more elements on a rendered page.
///
/// Ordering within a locator list is priority: the first locator that
/// yields a visible, enabled element wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Structural text-path match (XPath).
    XPath(String),
    /// Attribute or class match (CSS).
    Css(String),
}

impl Locator {
    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn css(expr: impl Into<String>) -> Self {
        Locator::Css(expr.into())
    }

    /// The raw expression, whichever kind it is.
    pub fn expression(&self) -> &str {
        match self {
            Locator::XPath(e) | Locator::Css(e) => e,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::XPath(e) => write!(f, "xpath '{e}'"),
            Locator::Css(e) => write!(f, "css '{e}'"),
        }
    }
}

/// Controls that open the wallet-connection flow.
pub fn connect_locators() -> Vec<Locator> {
    vec![
        Locator::xpath("//button[contains(text(), 'Connect')]"),
        Locator::xpath("//button[contains(text(), 'Sign in')]"),
        Locator::xpath("//button[contains(text(), 'Connect Wallet')]"),
        Locator::xpath("//div[contains(@class, 'connect')]//button"),
        Locator::css(".connect-wallet-btn"),
        Locator::css(".connect-button"),
        Locator::css("[data-testid='connect-wallet']"),
        Locator::css("#connect-wallet"),
    ]
}

/// Controls that trigger a merit claim.
pub fn claim_locators() -> Vec<Locator> {
    vec![
        Locator::xpath("//button[contains(text(), 'Claim')]"),
        Locator::xpath("//button[contains(text(), 'Collect')]"),
        Locator::xpath("//button[contains(text(), 'Get Reward')]"),
        Locator::xpath("//div[contains(@class, 'claim')]//button"),
        Locator::css(".claim-button"),
        Locator::css(".claim-btn"),
        Locator::css("[data-testid='claim-button']"),
        Locator::css("#claim-btn"),
    ]
}

/// Elements styled like a completed action, checked by the classifier.
pub fn success_style_locators() -> Vec<Locator> {
    vec![
        Locator::css(".success"),
        Locator::css(".completed"),
        Locator::css(".claimed"),
        Locator::css(".earned"),
        Locator::css("[class*='success']"),
        Locator::css("[class*='complete']"),
        Locator::css("[class*='claim']"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_lookup() {
        let loc = Locator::css(".claim-button");
        assert_eq!(loc.expression(), ".claim-button");
        let loc = Locator::xpath("//button");
        assert_eq!(loc.expression(), "//button");
    }

    #[test]
    fn test_text_matches_come_first() {
        // Text-path locators lead both action lists so visible labels beat
        // class-name guesses.
        assert!(matches!(connect_locators()[0], Locator::XPath(_)));
        assert!(matches!(claim_locators()[0], Locator::XPath(_)));
        assert_eq!(connect_locators().len(), 8);
        assert_eq!(claim_locators().len(), 8);
        assert_eq!(success_style_locators().len(), 7);
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::css("#x").to_string(), "css '#x'");
        assert_eq!(Locator::xpath("//a").to_string(), "xpath '//a'");
    }
}
