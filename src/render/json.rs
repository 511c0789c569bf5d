// src/render/json.rs
// The JSON view: the contributor array, pretty-printed with two-space indents.

use crate::error::HubResult;
use crate::github::Contributor;

pub fn render_json(contributors: &[Contributor]) -> HubResult<String> {
    Ok(serde_json::to_string_pretty(contributors)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_renders_brackets() {
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_pretty_output_shape() {
        let contributors = vec![Contributor {
            login: "octocat".into(),
            avatar_url: "https://avatars.githubusercontent.com/u/583231?v=4".into(),
            html_url: "https://github.com/octocat".into(),
            contributions: 3,
        }];

        let expected = r#"[
  {
    "login": "octocat",
    "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
    "html_url": "https://github.com/octocat",
    "contributions": 3
  }
]"#;
        assert_eq!(render_json(&contributors).unwrap(), expected);
    }
}
