// src/render/table.rs
// =============================================================================
// The table view: HTML that renders as an avatar grid inside a README.
//
// GitHub's Markdown renderer accepts inline HTML, so the "Markdown" users
// paste is really a <table> with up to 8 avatars per row:
//
//   <table>
//     <tbody>
//       <tr><td ...><a href="profile" title="login"><img .../></a></td>...
//       </tr>
//     </tbody>
//   </table>
//
// render_markdown_list() is a plain pipe-table alternative for renderers
// that strip raw HTML.
// =============================================================================

use std::fmt::Write;

use crate::github::Contributor;

// Avatars per table row
pub const MAX_COLUMNS: usize = 8;

// Builds the HTML contributor table
//
// Returns an empty string when there is nothing to show.
pub fn render_table(contributors: &[Contributor]) -> String {
    if contributors.is_empty() {
        return String::new();
    }

    let cell_width = 100.0 / MAX_COLUMNS as f64;
    let mut out = String::from("<table>\n  <tbody>\n");

    for group in contributors.chunks(MAX_COLUMNS) {
        out.push_str("    <tr>");
        for dev in group {
            // write! into a String cannot fail
            let _ = write!(
                out,
                "<td align=\"center\" valign=\"top\" width=\"{cell_width}%\" \
                 style=\"word-break: break-word; white-space: normal;\">\
                 <a href=\"{href}\" title=\"{login}\">\
                 <img src=\"{avatar}\" width=\"100px;\" alt=\"{login}\" style=\"border-radius: 9999px;\" />\
                 </a></td>",
                href = escape_attr(&dev.html_url),
                login = escape_attr(&dev.login),
                avatar = escape_attr(&dev.avatar_url),
            );
        }
        out.push_str("\n    </tr>\n");
    }

    out.push_str("\n  </tbody>\n</table>");
    out
}

// One row per contributor: avatar, linked login, contribution count
pub fn render_markdown_list(contributors: &[Contributor]) -> String {
    if contributors.is_empty() {
        return String::new();
    }

    let mut out = String::from("| Avatar | Login | Contributions |\n| :---: | :--- | ---: |\n");
    for dev in contributors {
        let _ = writeln!(
            out,
            "| <img src=\"{avatar}\" width=\"50\" alt=\"{alt}\" /> | [{login}](<{href}>) | {count} |",
            avatar = escape_attr(&dev.avatar_url),
            alt = escape_attr(&dev.login),
            login = escape_markdown(&dev.login, &['\\', '[', ']', '|']),
            href = escape_markdown(&dev.html_url, &['\\', '<', '>', '|']),
            count = dev.contributions,
        );
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// Backslash-escapes the given characters
fn escape_markdown(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if special.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
