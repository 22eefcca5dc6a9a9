//! `{{.NAME}}` placeholder substitution for commands and output templates.

use crate::args::Vars;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("Invalid placeholder regex")
});

/// Variable scopes searched in order, first match wins.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    layers: Vec<&'a Vars>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer with lower precedence than those already added.
    pub fn with(mut self, vars: &'a Vars) -> Self {
        self.layers.push(vars);
        self
    }

    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.layers
            .iter()
            .copied()
            .find_map(|vars| vars.get(name))
            .map(String::as_str)
    }

    /// Every visible variable, with precedence applied.
    pub fn flatten(&self) -> Vars {
        let mut merged = Vars::new();
        for vars in self.layers.iter().rev() {
            merged.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }
}

/// Replace every `{{.NAME}}` in `template`. Unknown names render empty.
pub fn render(template: &str, scope: &Scope<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            scope.get(&caps[1]).unwrap_or_default().to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_names() {
        let v = vars(&[("CLI_ARGS", "'a b'"), ("TASK", "build")]);
        let scope = Scope::new().with(&v);
        assert_eq!(
            render("echo {{.TASK}} {{ .CLI_ARGS }}", &scope),
            "echo build 'a b'"
        );
    }

    #[test]
    fn unknown_names_render_empty() {
        let scope = Scope::new();
        assert_eq!(render("x{{.MISSING}}y", &scope), "xy");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let scope = Scope::new();
        assert_eq!(render("echo {not a var} $HOME", &scope), "echo {not a var} $HOME");
    }

    #[test]
    fn earlier_layers_win() {
        let call = vars(&[("NAME", "call")]);
        let global = vars(&[("NAME", "global"), ("OTHER", "g")]);
        let scope = Scope::new().with(&call).with(&global);

        assert_eq!(render("{{.NAME}}-{{.OTHER}}", &scope), "call-g");
        let flat = scope.flatten();
        assert_eq!(flat["NAME"], "call");
        assert_eq!(flat["OTHER"], "g");
    }
}
