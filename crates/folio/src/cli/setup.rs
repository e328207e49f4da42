use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use folioapp::model::{AlbumStatus, ArticleStatus, CategoryKind, LinkKind, ThemeMode};
use folioapp::query::SortMode;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    bin_name = "folio",
    version,
    disable_help_subcommand = true,
    after_help = "Records can be referred to by UUID, UUID prefix, name or slug.\nLogging goes to stderr; set FOLIO_LOG (e.g. FOLIO_LOG=debug) to tune it."
)]
#[command(about = "Manage articles, albums, media, tags and links of a folio site", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides FOLIO_DATA_DIR and folio.toml)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file [default: ./folio.toml]
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Search, sort and paging options shared by every listing.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort mode: az-asc, az-desc, date-asc, date-desc, order-asc, order-desc
    #[arg(long)]
    pub sort: Option<SortMode>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page [default: from config]
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Blog articles
    #[command(subcommand)]
    #[command(alias = "a", display_order = 1)]
    Articles(ArticleCommands),

    /// Article and album categories
    #[command(subcommand)]
    #[command(alias = "c", display_order = 2)]
    Categories(CategoryCommands),

    /// Photo albums
    #[command(subcommand)]
    #[command(display_order = 3)]
    Albums(AlbumCommands),

    /// Media library
    #[command(subcommand)]
    #[command(alias = "m", display_order = 4)]
    Media(MediaCommands),

    /// Article tags
    #[command(subcommand)]
    #[command(alias = "t", display_order = 5)]
    Tags(TagCommands),

    /// Link hub entries
    #[command(subcommand)]
    #[command(alias = "l", display_order = 6)]
    Links(LinkCommands),

    /// Site appearance
    #[command(subcommand)]
    #[command(display_order = 7)]
    Settings(SettingsCommands),

    /// Search, filter, sort and paginate a JSON array of records
    #[command(display_order = 8)]
    Query(QueryArgs),
}

#[derive(Subcommand, Debug)]
pub enum ArticleCommands {
    /// List articles
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by status (draft, published, scheduled or all)
        #[arg(long)]
        status: Option<String>,

        /// Filter by category (selector, or "none")
        #[arg(long)]
        category: Option<String>,

        /// Filter by tag (selector)
        #[arg(long)]
        tag: Option<String>,

        /// Filter by featured flag
        #[arg(long)]
        featured: Option<bool>,

        /// List deleted articles instead
        #[arg(long)]
        deleted: bool,
    },

    /// Show one article
    #[command(alias = "v")]
    Show { article: String },

    /// Create an article
    #[command(alias = "n")]
    Create {
        /// Title words
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        #[command(flatten)]
        body: BodyArgs,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        excerpt: Option<String>,

        /// Category selector
        #[arg(long)]
        category: Option<String>,

        /// Tag name, created when missing (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long, default_value = "draft")]
        status: ArticleStatus,

        /// Publish time for scheduled articles (RFC 3339)
        #[arg(long)]
        schedule: Option<DateTime<Utc>>,

        /// Cover media selector
        #[arg(long)]
        cover: Option<String>,

        #[arg(long)]
        featured: bool,
    },

    /// Update an article
    #[command(alias = "e")]
    Update {
        article: String,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        body: BodyArgs,

        #[arg(long)]
        slug: Option<String>,

        /// New excerpt, or "none" to regenerate it from the content
        #[arg(long)]
        excerpt: Option<String>,

        /// Category selector, or "none"
        #[arg(long)]
        category: Option<String>,

        /// Replace the tag set (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,

        #[arg(long)]
        status: Option<ArticleStatus>,

        #[arg(long)]
        schedule: Option<DateTime<Utc>>,

        /// Cover media selector, or "none"
        #[arg(long)]
        cover: Option<String>,

        #[arg(long)]
        featured: Option<bool>,
    },

    /// Delete articles
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        articles: Vec<String>,
    },

    /// Restore deleted articles
    Restore {
        #[arg(required = true, num_args = 1..)]
        articles: Vec<String>,
    },

    /// Publish scheduled articles whose time has come
    PublishDue,

    /// Published articles as the public site shows them
    Feed {
        #[command(flatten)]
        list: ListArgs,
    },
}

/// Article body, inline or from a file.
#[derive(Args, Debug, Clone, Default)]
pub struct BodyArgs {
    /// Markdown content
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,

    /// Read markdown content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by kind (article, album, both or all)
        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        deleted: bool,
    },

    /// Show categories as a tree
    Tree {
        /// Only categories accepting this kind of content
        #[arg(long)]
        kind: Option<CategoryKind>,
    },

    /// Create a category
    #[command(alias = "n")]
    Create {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, default_value = "both")]
        kind: CategoryKind,

        /// Parent category selector
        #[arg(long)]
        parent: Option<String>,
    },

    /// Update a category
    #[command(alias = "e")]
    Update {
        category: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        /// New description, or "none"
        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        kind: Option<CategoryKind>,

        /// Parent category selector, or "none"
        #[arg(long)]
        parent: Option<String>,
    },

    /// Delete categories
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        categories: Vec<String>,
    },

    /// Restore deleted categories
    Restore {
        #[arg(required = true, num_args = 1..)]
        categories: Vec<String>,
    },

    /// Put categories first, in the given order
    Reorder {
        #[arg(required = true, num_args = 1..)]
        categories: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AlbumCommands {
    /// List albums
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        #[arg(long)]
        status: Option<String>,

        /// Category selector, or "none"
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        deleted: bool,
    },

    /// Create an album
    #[command(alias = "n")]
    Create {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,

        #[arg(long)]
        slug: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// Free-form tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long, default_value = "draft")]
        status: AlbumStatus,

        /// Media selector for the gallery (repeatable)
        #[arg(long = "media")]
        media: Vec<String>,

        /// Cover media selector [default: first gallery item]
        #[arg(long)]
        cover: Option<String>,
    },

    /// Update an album
    #[command(alias = "e")]
    Update {
        album: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        slug: Option<String>,

        /// New description, or "none"
        #[arg(long)]
        description: Option<String>,

        /// Category selector, or "none"
        #[arg(long)]
        category: Option<String>,

        /// Replace the tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        status: Option<AlbumStatus>,

        /// Cover media selector, or "none"
        #[arg(long)]
        cover: Option<String>,
    },

    /// Delete albums
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        albums: Vec<String>,
    },

    /// Restore deleted albums
    Restore {
        #[arg(required = true, num_args = 1..)]
        albums: Vec<String>,
    },

    /// Append media to an album gallery
    AddMedia {
        album: String,
        #[arg(required = true, num_args = 1..)]
        media: Vec<String>,
    },

    /// Remove media from an album gallery
    RemoveMedia {
        album: String,
        #[arg(required = true, num_args = 1..)]
        media: Vec<String>,
    },

    /// Set the gallery order (every item, once)
    ReorderMedia {
        album: String,
        #[arg(required = true, num_args = 1..)]
        media: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum MediaCommands {
    /// List media
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by MIME type
        #[arg(long)]
        mime: Option<String>,

        #[arg(long)]
        deleted: bool,
    },

    /// Register a media file
    #[command(alias = "n")]
    Add {
        file_name: String,

        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        alt: String,

        /// MIME type [default: guessed from the extension]
        #[arg(long)]
        mime: Option<String>,
    },

    /// Update media details
    #[command(alias = "e")]
    Update {
        media: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        alt: Option<String>,

        /// MIME type, or "none"
        #[arg(long)]
        mime: Option<String>,
    },

    /// Delete media
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        media: Vec<String>,
    },

    /// Restore deleted media
    Restore {
        #[arg(required = true, num_args = 1..)]
        media: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List tags
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only tags in use (true) or unused (false)
        #[arg(long)]
        used: Option<bool>,

        #[arg(long)]
        deleted: bool,
    },

    /// Create a tag
    #[command(alias = "n")]
    Create {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,

        #[arg(long)]
        slug: Option<String>,
    },

    /// Rename a tag
    Rename { tag: String, name: String },

    /// Delete unused tags
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Restore deleted tags
    Restore {
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Rebuild usage counts from the articles
    Recount,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommands {
    /// List links
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by kind (main, social or all)
        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        deleted: bool,
    },

    /// Create a link
    #[command(alias = "n")]
    Create {
        title: String,
        url: String,

        #[arg(long, default_value = "main")]
        kind: LinkKind,

        /// Create the link disabled
        #[arg(long)]
        inactive: bool,
    },

    /// Update a link
    #[command(alias = "e")]
    Update {
        link: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        kind: Option<LinkKind>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Flip links between active and inactive
    Toggle {
        #[arg(required = true, num_args = 1..)]
        links: Vec<String>,
    },

    /// Put links of one kind first, in the given order
    Reorder {
        kind: LinkKind,
        #[arg(required = true, num_args = 1..)]
        links: Vec<String>,
    },

    /// Delete links
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        links: Vec<String>,
    },

    /// Restore deleted links
    Restore {
        #[arg(required = true, num_args = 1..)]
        links: Vec<String>,
    },

    /// Active links as the public hub shows them
    Hub,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the site settings
    Show,

    /// Change site settings
    Set {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        tagline: Option<String>,

        #[arg(long)]
        theme: Option<ThemeMode>,

        /// Accent color as #rgb or #rrggbb
        #[arg(long)]
        accent: Option<String>,

        #[arg(long)]
        posts_per_page: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// JSON file holding an array of records ("-" for stdin)
    pub file: PathBuf,

    #[command(flatten)]
    pub list: ListArgs,

    /// Equality filter as attr=value, "all" disables it (repeatable)
    #[arg(long = "filter", value_name = "ATTR=VALUE")]
    pub filters: Vec<String>,

    /// Key holding the record label
    #[arg(long, default_value = "title")]
    pub label: String,

    /// Key holding the record date
    #[arg(long, default_value = "createdAt")]
    pub date: String,

    /// Key holding the manual order
    #[arg(long, default_value = "order")]
    pub order: String,

    /// Keys searched by --search (repeatable) [default: title, description, slug]
    #[arg(long = "search-field")]
    pub search_fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_article_create() {
        let cli = Cli::try_parse_from([
            "folio", "articles", "create", "Hello", "World", "--tag", "rust", "--tag", "web",
            "--status", "published", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Articles(ArticleCommands::Create {
                title,
                tags,
                status,
                ..
            }) => {
                assert_eq!(title.join(" "), "Hello World");
                assert_eq!(tags, ["rust", "web"]);
                assert_eq!(status, ArticleStatus::Published);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_list_args() {
        let cli = Cli::try_parse_from([
            "folio", "a", "ls", "--sort", "az-asc", "--page", "2", "-s", "rust",
        ])
        .unwrap();
        match cli.command {
            Commands::Articles(ArticleCommands::List { list, .. }) => {
                assert_eq!(list.sort, Some(SortMode::AzAsc));
                assert_eq!(list.page, 2);
                assert_eq!(list.search.as_deref(), Some("rust"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_enum_values() {
        assert!(Cli::try_parse_from(["folio", "links", "create", "x", "/x", "--kind", "video"]).is_err());
        assert!(Cli::try_parse_from(["folio", "a", "ls", "--sort", "random"]).is_err());
    }
}
