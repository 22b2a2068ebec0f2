use crate::{
    config::Config,
    error::Result,
    file_ops::safely_write_file,
    indexer::build_index,
    render::render_catalog,
    splice::splice_document,
};
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub categories: usize,
    pub items: usize,
    pub document_updated: bool,
}

impl BuildReport {
    pub fn summary(&self) -> String {
        let status = if self.document_updated {
            "catalog HTML updated"
        } else {
            "HTML not modified (structure not identified)"
        };
        format!(
            "Found {} categories and {} items; {}",
            self.categories, self.items, status
        )
    }
}

/// Rebuilds the catalog document under `root` from the images on disk.
pub fn build(root: &Path, config: &Config) -> Result<BuildReport> {
    println!(
        "{} {}",
        "Scanning catalog in".blue(),
        root.display().to_string().yellow()
    );

    let index = build_index(root, &config.catalog)?;
    let rendered = render_catalog(&index)?;

    let document_path = root.join(&config.catalog.document);
    let document_updated = match fs::read_to_string(&document_path) {
        Ok(html) => match splice_document(&html, &rendered) {
            Some(updated) => {
                safely_write_file(&document_path, &updated)?;
                true
            }
            None => {
                println!(
                    "{}",
                    "Could not identify the HTML structure, only counting items.".yellow()
                );
                false
            }
        },
        Err(e) => {
            println!(
                "{} {}: {}",
                "Could not read".yellow(),
                document_path.display().to_string().yellow(),
                e
            );
            false
        }
    };

    let report = BuildReport {
        categories: index.category_count(),
        items: index.item_count(),
        document_updated,
    };

    println!(
        "{} {} categories",
        "Found".green(),
        report.categories.to_string().cyan()
    );
    println!(
        "{} {} items",
        "Total of".green(),
        report.items.to_string().cyan()
    );
    if report.document_updated {
        println!(
            "{} {}",
            "Catalog HTML updated successfully:".green(),
            document_path.display().to_string().yellow()
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = concat!(
        "<html><body>\n",
        "<nav class=\"sidebar-nav\"></nav>\n",
        "<!-- CONTENT START -->\n",
        "<!-- CONTENT END -->\n",
        "</body></html>\n"
    );

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn build_updates_document_with_markers() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("index.html"), TEMPLATE).unwrap();
        touch(root, "Produtos/Cadeiras/1.jpg");
        touch(root, "Produtos/Cadeiras/2.jpg");
        touch(root, "Sofas/a.png");

        let report = build(root, &Config::default()).unwrap();
        assert_eq!(
            report,
            BuildReport {
                categories: 2,
                items: 3,
                document_updated: true
            }
        );

        let html = fs::read_to_string(root.join("index.html")).unwrap();
        assert!(html.contains(r#"id="Produtos/Cadeiras""#));
        assert!(html.contains(r#"id="Sofas""#));
        assert!(html.contains("categoryList"));
        assert!(html.ends_with("<!-- CONTENT END -->\n</body></html>\n"));
    }

    #[test]
    fn rebuilding_is_stable() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("index.html"), TEMPLATE).unwrap();
        touch(root, "Produtos/2.jpg");
        touch(root, "Produtos/10.jpg");

        build(root, &Config::default()).unwrap();
        let first = fs::read_to_string(root.join("index.html")).unwrap();
        build(root, &Config::default()).unwrap();
        let second = fs::read_to_string(root.join("index.html")).unwrap();
        assert_eq!(first, second);
        assert!(first.find("Produtos/2.jpg").unwrap() < first.find("Produtos/10.jpg").unwrap());
    }

    #[test]
    fn unrecognized_document_is_untouched() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::write(root.join("index.html"), "<p>plain</p>").unwrap();
        touch(root, "Produtos/1.jpg");

        let report = build(root, &Config::default()).unwrap();
        assert!(!report.document_updated);
        assert_eq!(report.items, 1);
        assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), "<p>plain</p>");
    }

    #[test]
    fn missing_document_only_counts() {
        let tmp = TempDir::new().unwrap();
        let report = build(tmp.path(), &Config::default()).unwrap();
        assert_eq!(report.categories, 0);
        assert_eq!(report.items, 0);
        assert!(!report.document_updated);
        assert!(report.summary().contains("not modified"));
    }
}
