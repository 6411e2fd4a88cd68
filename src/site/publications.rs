//! Publications list
//!
//! Loads the bibliography from a JSON data file and rebuilds the publications
//! fragment: cover image, title, author list with the site owner bolded, venue
//! with an optional "Oral" qualifier, and conditional Code/Paper links.

use super::escape_html;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// External links attached to a publication
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicationLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
}

/// One bibliography entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub title: String,
    pub authors: Vec<String>,
    pub conference: String,
    pub year: u16,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub links: PublicationLinks,
    #[serde(default)]
    pub is_oral: bool,
}

/// Load the bibliography from a JSON file; missing or malformed reads as empty.
pub fn load_publications(path: impl AsRef<Path>) -> Vec<Publication> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Publications file unreadable");
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(publications) => publications,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Publications file malformed");
            Vec::new()
        }
    }
}

/// Rebuild the publications fragment, bolding `owner` in author lists.
pub fn render_publications(publications: &[Publication], owner: &str) -> String {
    let mut html = String::new();

    for publication in publications {
        let authors = publication
            .authors
            .iter()
            .map(|author| {
                if author == owner {
                    format!("<strong>{}</strong>", escape_html(author))
                } else {
                    escape_html(author)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut venue = escape_html(&publication.conference);
        if publication.is_oral {
            venue.push_str(", <strong>Oral</strong>");
        }

        html.push_str(&format!(
            r#"<li class="flex items-start">
  <img src="{cover}" alt="{title} Paper Cover" class="aspect-video w-48 max-w-full object-cover rounded mr-4 border border-gray-200">
  <div>
    <span><i class="fa fa-file-text-o text-primary mr-2 mt-1 inline-block"></i><strong>{title}</strong><br>{authors}<br>{venue}, {year}</span>
    <div class="flex space-x-4 mt-2">
"#,
            cover = escape_html(&publication.cover_image),
            title = escape_html(&publication.title),
            authors = authors,
            venue = venue,
            year = publication.year,
        ));

        if let Some(code) = &publication.links.code {
            html.push_str(&format!(
                r#"      <a href="{}" target="_blank" class="text-primary hover:text-primary/80 flex items-center text-sm"><i class="fa fa-github mr-1"></i> Code</a>
"#,
                escape_html(code)
            ));
        }

        if let Some(paper) = &publication.links.paper {
            html.push_str(&format!(
                r#"      <a href="{}" target="_blank" class="text-primary hover:text-primary/80 flex items-center text-sm"><i class="fa fa-file-pdf-o mr-1"></i> Paper</a>
"#,
                escape_html(paper)
            ));
        }

        html.push_str("    </div>\n  </div>\n</li>\n");
    }

    html
}
