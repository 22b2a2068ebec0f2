use crate::{
    error::Result,
    indexer::{CatalogIndex, Category, ItemRecord},
};
use serde::Serialize;
use tera::{Context, Tera};

const SIDEBAR_TEMPLATE: &str = r##"
{%- for category in categories %}
                    <li class="category-item">
                        <a href="#{{ category.name | urlencode | safe }}" class="category-link" onclick="showSection('{{ category.name | urlencode | safe }}', event)">
                            {{ category.name }} <span style="float: right; opacity: 0.7;">({{ category.count }})</span>
                        </a>
{%- if category.has_subcategories %}
                        <ul class="subcategory-list">
{%- for sub in category.subcategories %}
                            <li class="subcategory-item">
                                <a href="#{{ sub.full_path | urlencode | safe }}" class="subcategory-link" onclick="showSection('{{ sub.full_path | urlencode | safe }}', event)">
                                    {{ sub.name }} ({{ sub.count }})
                                </a>
                            </li>
{%- endfor %}
                        </ul>
{%- endif %}
                    </li>
{%- endfor %}"##;

const SECTIONS_TEMPLATE: &str = r#"
{%- for section in sections %}
            <section class="section" id="{{ section.id | urlencode | safe }}" data-category="{{ section.category }}"{% if section.is_subcategory %} data-subcategory="{{ section.subcategory }}"{% endif %}>
                <div class="section-header">
                    <div class="section-header-info">
                        <h2>{{ section.category }}{% if section.is_subcategory %} / {{ section.subcategory }}{% endif %}</h2>
                        <span class="item-count">{{ section.count }} {% if section.count == 1 %}item{% else %}itens{% endif %}</span>
                    </div>
{%- if not section.aggregated %}
                    <button class="add-product-btn" onclick="openProductModal('{{ section.target }}')">
                        ➕ Adicionar Produto
                    </button>
{%- endif %}
                </div>
{%- if section.aggregated %}
{%- for group in section.groups %}
                <div style="margin-bottom: 40px;">
                    <div class="section-header">
                        <div class="section-header-info">
                            <h3 style="font-size: 1.3rem; color: #2c3e50; margin-bottom: 10px;">{{ group.name }}</h3>
                            <span class="item-count">{{ group.count }} {% if group.count == 1 %}item{% else %}itens{% endif %}</span>
                        </div>
                        <button class="add-product-btn" onclick="openProductModal('{{ group.full_path }}')">
                            ➕ Adicionar Produto
                        </button>
                    </div>
                    <div class="image-grid">
{%- for item in group.items %}
                        <div class="image-card" onclick="openModal('{{ item.path | urlencode | safe }}', '{{ item.stem }}')">
                            <button class="delete-btn" onclick="openDeleteModal('{{ item.path | urlencode | safe }}', '{{ item.stem }}', event)" title="Deletar produto">
                                ✕
                            </button>
                            <div class="image-wrapper">
                                <img src="{{ item.thumbnail | urlencode | safe }}" alt="{{ item.stem }}" loading="lazy">
                            </div>
                            <div class="image-info">
                                <div class="image-name" title="{{ item.stem }}">{{ item.stem }}</div>
                            </div>
                        </div>
{%- endfor %}
                    </div>
                </div>
{%- endfor %}
{%- else %}
                <div class="image-grid">
{%- for item in section.items %}
                    <div class="image-card" onclick="openModal('{{ item.path | urlencode | safe }}', '{{ item.stem }}')">
                        <button class="delete-btn" onclick="openDeleteModal('{{ item.path | urlencode | safe }}', '{{ item.stem }}', event)" title="Deletar produto">
                            ✕
                        </button>
                        <div class="image-wrapper">
                            <img src="{{ item.thumbnail | urlencode | safe }}" alt="{{ item.stem }}" loading="lazy">
                        </div>
                        <div class="image-info">
                            <div class="image-name" title="{{ item.stem }}">{{ item.stem }}</div>
                        </div>
                    </div>
{%- endfor %}
                </div>
{%- endif %}
            </section>
{%- endfor %}"#;

/// The two text fragments spliced into the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCatalog {
    pub sidebar: String,
    pub sections: String,
}

#[derive(Serialize)]
struct ItemView<'a> {
    stem: &'a str,
    path: &'a str,
    thumbnail: &'a str,
}

#[derive(Serialize)]
struct GroupView<'a> {
    name: &'a str,
    full_path: String,
    count: usize,
    items: Vec<ItemView<'a>>,
}

#[derive(Serialize)]
struct NavView<'a> {
    name: &'a str,
    count: usize,
    has_subcategories: bool,
    subcategories: Vec<GroupView<'a>>,
}

#[derive(Serialize)]
struct SectionView<'a> {
    id: String,
    category: &'a str,
    subcategory: &'a str,
    is_subcategory: bool,
    aggregated: bool,
    target: String,
    count: usize,
    groups: Vec<GroupView<'a>>,
    items: Vec<ItemView<'a>>,
}

fn item_views(items: &[ItemRecord]) -> Vec<ItemView<'_>> {
    items
        .iter()
        .map(|item| ItemView {
            stem: item.stem(),
            path: &item.path,
            thumbnail: &item.thumbnail,
        })
        .collect()
}

fn group_views(category: &Category) -> Vec<GroupView<'_>> {
    category
        .subcategories()
        .map(|(name, items)| GroupView {
            name,
            full_path: format!("{}/{}", category.name, name),
            count: items.len(),
            items: item_views(items),
        })
        .collect()
}

fn nav_view(category: &Category) -> NavView<'_> {
    NavView {
        name: &category.name,
        count: category.item_count(),
        has_subcategories: category.has_subcategories(),
        subcategories: group_views(category),
    }
}

fn plain_section<'a>(category: &'a Category, items: &'a [ItemRecord]) -> SectionView<'a> {
    SectionView {
        id: category.name.clone(),
        category: &category.name,
        subcategory: "",
        is_subcategory: false,
        aggregated: false,
        target: category.name.clone(),
        count: items.len(),
        groups: Vec::new(),
        items: item_views(items),
    }
}

/// Sections for one category: a lone root grid, or the aggregated view
/// followed by one addressable section per subcategory and the root grid.
fn section_views(category: &Category) -> Vec<SectionView<'_>> {
    if !category.has_subcategories() {
        return category
            .root_items()
            .map(|items| vec![plain_section(category, items)])
            .unwrap_or_default();
    }

    let mut sections = Vec::new();
    let groups = group_views(category);
    sections.push(SectionView {
        id: category.name.clone(),
        category: &category.name,
        subcategory: "",
        is_subcategory: false,
        aggregated: true,
        target: category.name.clone(),
        count: groups.iter().map(|g| g.count).sum(),
        groups,
        items: Vec::new(),
    });

    for (name, items) in category.subcategories() {
        let full_path = format!("{}/{}", category.name, name);
        sections.push(SectionView {
            id: full_path.clone(),
            category: &category.name,
            subcategory: name,
            is_subcategory: true,
            aggregated: false,
            target: full_path,
            count: items.len(),
            groups: Vec::new(),
            items: item_views(items),
        });
    }

    if let Some(items) = category.root_items() {
        sections.push(plain_section(category, items));
    }
    sections
}

fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("sidebar.html", SIDEBAR_TEMPLATE),
        ("sections.html", SECTIONS_TEMPLATE),
    ])?;
    Ok(tera)
}

pub fn render_catalog(index: &CatalogIndex) -> Result<RenderedCatalog> {
    let tera = templates()?;

    let nav: Vec<NavView> = index.categories.iter().map(nav_view).collect();
    let sections: Vec<SectionView> = index.categories.iter().flat_map(section_views).collect();

    let mut context = Context::new();
    context.insert("categories", &nav);
    context.insert("sections", &sections);

    Ok(RenderedCatalog {
        sidebar: tera.render("sidebar.html", &context)?,
        sections: tera.render("sections.html", &context)?,
    })
}
