use crate::{
    config::Catalog,
    error::Result,
    natural_sort::{stable_natural_cmp, sort_naturally},
    utils::{file_name_lossy, is_not_hidden_dir, to_slash_path},
};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub filename: String,
    pub path: String,
    pub thumbnail: String,
}

impl ItemRecord {
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(stem, _)| stem)
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail != self.path
    }
}

/// Where an image sits inside its category: directly in the category folder,
/// or under a subfolder addressed by its `/`-joined relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bucket {
    Root,
    Sub(String),
}

impl Ord for Bucket {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Bucket::Root, Bucket::Root) => Ordering::Equal,
            (Bucket::Root, Bucket::Sub(_)) => Ordering::Less,
            (Bucket::Sub(_), Bucket::Root) => Ordering::Greater,
            (Bucket::Sub(a), Bucket::Sub(b)) => stable_natural_cmp(a, b),
        }
    }
}

impl PartialOrd for Bucket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub buckets: BTreeMap<Bucket, Vec<ItemRecord>>,
}

impl Category {
    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn root_items(&self) -> Option<&[ItemRecord]> {
        self.buckets.get(&Bucket::Root).map(Vec::as_slice)
    }

    pub fn has_subcategories(&self) -> bool {
        self.buckets.keys().any(|b| matches!(b, Bucket::Sub(_)))
    }

    /// Subcategories in natural order.
    pub fn subcategories(&self) -> impl Iterator<Item = (&str, &[ItemRecord])> {
        self.buckets.iter().filter_map(|(bucket, items)| match bucket {
            Bucket::Sub(name) => Some((name.as_str(), items.as_slice())),
            Bucket::Root => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogIndex {
    pub categories: Vec<Category>,
}

impl CatalogIndex {
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(Category::item_count).sum()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn records(&self) -> impl Iterator<Item = &ItemRecord> {
        self.categories
            .iter()
            .flat_map(|c| c.buckets.values())
            .flatten()
    }
}

pub fn build_index(root: &Path, catalog: &Catalog) -> Result<CatalogIndex> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    sort_naturally(&mut names);

    let mut index = CatalogIndex::default();
    for name in names {
        let category_path = root.join(&name);
        if name.starts_with('.') || catalog.is_excluded(&name) || !category_path.is_dir() {
            continue;
        }

        let buckets = index_category(root, &category_path, catalog);
        if !buckets.is_empty() {
            index.categories.push(Category { name, buckets });
        }
    }

    Ok(index)
}

fn index_category(
    root: &Path,
    category_path: &Path,
    catalog: &Catalog,
) -> BTreeMap<Bucket, Vec<ItemRecord>> {
    let mut buckets: BTreeMap<Bucket, Vec<ItemRecord>> = BTreeMap::new();

    for entry in WalkDir::new(category_path)
        .min_depth(1)
        .sort_by(|a, b| stable_natural_cmp(&file_name_lossy(a), &file_name_lossy(b)))
        .into_iter()
        .filter_entry(|e| keep_subdir(e, catalog))
        .filter_map(|e| e.ok())
    {
        // follows symlinks, so linked images count like regular files
        if !entry.path().is_file() || !catalog.is_image(entry.path()) {
            continue;
        }

        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        let bucket = match entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(category_path).ok())
        {
            Some(sub) if !sub.as_os_str().is_empty() => Bucket::Sub(to_slash_path(sub)),
            _ => Bucket::Root,
        };

        let record = ItemRecord {
            filename: file_name_lossy(&entry),
            path: to_slash_path(rel_path),
            thumbnail: resolve_thumbnail(root, rel_path, catalog),
        };
        buckets.entry(bucket).or_default().push(record);
    }

    buckets
}

fn keep_subdir(entry: &DirEntry, catalog: &Catalog) -> bool {
    if !is_not_hidden_dir(entry) {
        return false;
    }
    !(entry.file_type().is_dir() && catalog.is_excluded_subdir(&file_name_lossy(entry)))
}

/// Mirrored thumbnail path when one exists on disk, else the image path itself.
pub fn resolve_thumbnail(root: &Path, rel_path: &Path, catalog: &Catalog) -> String {
    let thumbnail = Path::new(&catalog.thumbnail_dir).join(rel_path);
    if root.join(&thumbnail).exists() {
        to_slash_path(&thumbnail)
    } else {
        to_slash_path(rel_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn filenames(items: &[ItemRecord]) -> Vec<&str> {
        items.iter().map(|i| i.filename.as_str()).collect()
    }

    #[test]
    fn scenario_cadeiras_with_one_thumbnail() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Produtos/Cadeiras/1.jpg");
        touch(root, "Produtos/Cadeiras/10.jpg");
        touch(root, "Produtos/Cadeiras/2.jpg");
        touch(root, ".thumbnails/Produtos/Cadeiras/1.jpg");

        let index = build_index(root, &Catalog::default()).unwrap();
        assert_eq!(index.category_count(), 1);
        let produtos = index.get("Produtos").unwrap();
        let (name, items) = produtos.subcategories().next().unwrap();
        assert_eq!(name, "Cadeiras");
        assert_eq!(filenames(items), vec!["1.jpg", "2.jpg", "10.jpg"]);

        assert_eq!(items[0].path, "Produtos/Cadeiras/1.jpg");
        assert_eq!(items[0].thumbnail, ".thumbnails/Produtos/Cadeiras/1.jpg");
        assert!(items[0].has_thumbnail());
        assert_eq!(items[1].thumbnail, items[1].path);
        assert_eq!(items[2].thumbnail, items[2].path);
        assert!(produtos.root_items().is_none());
    }

    #[test]
    fn root_and_sub_buckets_are_separate() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Mesas/capa.png");
        touch(root, "Mesas/Jantar/a.jpg");
        touch(root, "Mesas/Centro/b.jpg");

        let index = build_index(root, &Catalog::default()).unwrap();
        let mesas = index.get("Mesas").unwrap();
        assert_eq!(filenames(mesas.root_items().unwrap()), vec!["capa.png"]);
        let subs: Vec<&str> = mesas.subcategories().map(|(n, _)| n).collect();
        assert_eq!(subs, vec!["Centro", "Jantar"]);
        assert_eq!(mesas.item_count(), 3);
        assert!(mesas.has_subcategories());
    }

    #[test]
    fn folder_named_like_old_sentinel_is_a_subcategory() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Sofas/__root__/x.jpg");
        touch(root, "Sofas/y.jpg");

        let index = build_index(root, &Catalog::default()).unwrap();
        let sofas = index.get("Sofas").unwrap();
        assert_eq!(filenames(sofas.root_items().unwrap()), vec!["y.jpg"]);
        let (name, items) = sofas.subcategories().next().unwrap();
        assert_eq!(name, "__root__");
        assert_eq!(filenames(items), vec!["x.jpg"]);
    }

    #[test]
    fn deeper_nesting_collapses_to_compound_keys() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Produtos/Cadeiras/Madeira/1.jpg");
        touch(root, "Produtos/Cadeiras/2.jpg");

        let index = build_index(root, &Catalog::default()).unwrap();
        let subs: Vec<&str> = index
            .get("Produtos")
            .unwrap()
            .subcategories()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(subs, vec!["Cadeiras", "Cadeiras/Madeira"]);
    }

    #[test]
    fn only_allow_listed_images_are_indexed_once() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Produtos/a.JPG");
        touch(root, "Produtos/b.webp");
        touch(root, "Produtos/c.txt");
        touch(root, "Produtos/d.pdf");
        touch(root, "Produtos/Sub/e.gif");

        let index = build_index(root, &Catalog::default()).unwrap();
        let paths: Vec<&str> = index.records().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["Produtos/a.JPG", "Produtos/b.webp", "Produtos/Sub/e.gif"]);
    }

    #[test]
    fn excluded_and_hidden_entries_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "thumbmails/old.jpg");
        touch(root, "node_modules/pkg/logo.png");
        touch(root, ".thumbnails/Produtos/a.jpg");
        touch(root, "Produtos/a.jpg");
        touch(root, "Produtos/.hidden/b.jpg");
        touch(root, "Produtos/thumbmails/c.jpg");
        touch(root, "loose.jpg");
        touch(root, "index.html");

        let index = build_index(root, &Catalog::default()).unwrap();
        assert_eq!(index.category_count(), 1);
        assert_eq!(index.item_count(), 1);
        assert_eq!(index.records().next().unwrap().path, "Produtos/a.jpg");
    }

    #[test]
    fn categories_follow_natural_order() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Linha 10/a.jpg");
        touch(root, "Linha 2/a.jpg");
        touch(root, "linha 1/a.jpg");

        let index = build_index(root, &Catalog::default()).unwrap();
        let names: Vec<&str> = index.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["linha 1", "Linha 2", "Linha 10"]);
    }

    #[test]
    fn empty_root_gives_empty_index() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Vazia")).unwrap();
        let index = build_index(tmp.path(), &Catalog::default()).unwrap();
        assert_eq!(index, CatalogIndex::default());
        assert_eq!(index.item_count(), 0);
    }

    #[test]
    fn indexing_twice_is_identical() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "A/x10.png");
        touch(root, "A/x9.png");
        touch(root, "B/Sub 2/y.jpg");
        touch(root, "B/Sub 11/y.jpg");

        let first = build_index(root, &Catalog::default()).unwrap();
        let second = build_index(root, &Catalog::default()).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_images_are_indexed() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "Produtos/a.jpg");
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "b.jpg");
        std::os::unix::fs::symlink(outside.path().join("b.jpg"), root.join("Produtos/b.jpg"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("gone.jpg"), root.join("Produtos/c.jpg"))
            .unwrap();

        let index = build_index(root, &Catalog::default()).unwrap();
        let produtos = index.get("Produtos").unwrap();
        assert_eq!(filenames(produtos.root_items().unwrap()), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn stem_drops_only_last_extension() {
        let record = ItemRecord {
            filename: "mesa.v2.jpg".into(),
            path: "A/mesa.v2.jpg".into(),
            thumbnail: "A/mesa.v2.jpg".into(),
        };
        assert_eq!(record.stem(), "mesa.v2");
        assert!(!record.has_thumbnail());
    }
}
