//! Livraria CLI - manage the bookstore catalog
//!
//! # Catalog Commands
//!
//! ```bash
//! livraria add "Dom Casmurro" "Machado de Assis" 1899 29,90
//! livraria list                      # Table of every book
//! livraria update-price 3 35,90      # Change the price of book 3
//! livraria remove 3                  # Delete book 3
//! livraria search machado            # Books by author (substring)
//! ```
//!
//! # Import / Export
//!
//! ```bash
//! livraria import planilha.csv      # Validate and insert every row
//! livraria export                    # exports/livros_exportados.csv
//! livraria export -o livros.csv
//! livraria backup                    # Manual backup with rotation
//! ```

use clap::{Parser, Subcommand};
use livraria::store::backup;
use livraria::{
    export_csv, import_csv, validate_price, validate_row, Book, BookStore, CatalogStore, Config,
    Field, NormalizedRow,
};
use serde_json::Value;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "livraria")]
#[command(about = "Bookstore catalog: validation, CSV import and export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to the catalog
    Add {
        /// Title
        title: String,
        /// Author
        author: String,
        /// Publication year
        year: String,
        /// Price (accepts decimal comma, e.g. 35,90)
        price: String,
    },

    /// List every book
    List,

    /// Change the price of a book
    UpdatePrice {
        /// Book ID
        id: i64,
        /// New price
        price: String,
    },

    /// Remove a book
    Remove {
        /// Book ID
        id: i64,
    },

    /// Search books by author (case-insensitive substring)
    Search {
        /// Part of the author's name
        author: String,
    },

    /// Export the catalog to CSV
    Export {
        /// Output file (default: exports/livros_exportados.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import books from a CSV file
    Import {
        /// Input CSV file
        input: PathBuf,
    },

    /// Back up the catalog file
    Backup,
}

type CmdResult = Result<(), Box<dyn Error>>;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match cli.command {
        Commands::Add {
            title,
            author,
            year,
            price,
        } => cmd_add(&config, title, author, year, price),

        Commands::List => cmd_list(&config),

        Commands::UpdatePrice { id, price } => cmd_update_price(&config, id, price),

        Commands::Remove { id } => cmd_remove(&config, id),

        Commands::Search { author } => cmd_search(&config, &author),

        Commands::Export { output } => cmd_export(&config, output.as_deref()),

        Commands::Import { input } => cmd_import(&config, &input),

        Commands::Backup => cmd_backup(&config).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("❌ Erro: {}", e);
        std::process::exit(1);
    }
}

fn open_store(config: &Config) -> Result<CatalogStore, Box<dyn Error>> {
    config.ensure_dirs()?;
    Ok(CatalogStore::open(config.store_path())?)
}

fn cmd_backup(config: &Config) -> Result<PathBuf, Box<dyn Error>> {
    config.ensure_dirs()?;
    let path = backup(&config.store_path(), &config.backup_dir(), config.max_backups)?;
    eprintln!("💾 Backup criado: {}", path.display());
    Ok(path)
}

fn cmd_add(config: &Config, title: String, author: String, year: String, price: String) -> CmdResult {
    let row = NormalizedRow {
        title: Value::String(title),
        author: Value::String(author),
        year: Value::String(year),
        price: Value::String(price),
        ..Default::default()
    };
    let book = validate_row(&row)?;

    let mut store = open_store(config)?;
    cmd_backup(config)?;

    if store.insert(&book)? {
        eprintln!("✅ Livro cadastrado: {} ({})", book.title, book.author);
    } else {
        eprintln!("⚠️  Livro já cadastrado (mesmo título, autor e ano); ignorado.");
    }
    Ok(())
}

fn cmd_list(config: &Config) -> CmdResult {
    let store = open_store(config)?;
    if store.is_empty() {
        eprintln!("📭 Nenhum livro cadastrado.");
        return Ok(());
    }
    print_table(store.all().iter());
    eprintln!("\n📚 {} livro(s)", store.len());
    Ok(())
}

fn cmd_update_price(config: &Config, id: i64, price: String) -> CmdResult {
    let price = validate_price(Field::Price.label(), &Value::String(price))?;

    let mut store = open_store(config)?;
    if store.get(id).is_none() {
        return Err(format!("Livro com ID {} não encontrado.", id).into());
    }
    cmd_backup(config)?;

    store.update_price(id, price)?;
    eprintln!("✅ Preço do livro {} atualizado para R$ {:.2}", id, price);
    Ok(())
}

fn cmd_remove(config: &Config, id: i64) -> CmdResult {
    let mut store = open_store(config)?;
    if store.get(id).is_none() {
        return Err(format!("Livro com ID {} não encontrado.", id).into());
    }
    cmd_backup(config)?;

    store.remove(id)?;
    eprintln!("🗑️  Livro {} removido.", id);
    Ok(())
}

fn cmd_search(config: &Config, author: &str) -> CmdResult {
    let store = open_store(config)?;
    let found = store.find_by_author(author);
    if found.is_empty() {
        eprintln!("🔍 Nenhum livro encontrado para o autor '{}'.", author);
        return Ok(());
    }
    print_table(found.into_iter());
    Ok(())
}

fn cmd_export(config: &Config, output: Option<&Path>) -> CmdResult {
    let store = open_store(config)?;
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.default_export_path());

    let path = export_csv(store.all(), &target)?;
    eprintln!("📤 {} livro(s) exportado(s) para: {}", store.len(), path.display());
    Ok(())
}

fn cmd_import(config: &Config, input: &Path) -> CmdResult {
    eprintln!("📄 Importando: {}", input.display());

    let mut store = open_store(config)?;
    // Nothing to import means nothing to back up.
    if input.is_file() {
        cmd_backup(config)?;
    }

    // Row errors and whole-import failures are already logged by the pipeline.
    let outcome = import_csv(input, &mut store);
    if outcome.is_failure() {
        return Err("importação não realizada.".into());
    }

    eprintln!("\n✅ Inseridos: {}", outcome.inserted);
    eprintln!("⚠️  Ignorados: {}", outcome.skipped);
    Ok(())
}

fn print_table<'a>(books: impl Iterator<Item = &'a Book>) {
    println!(
        "{:<5} {:<40} {:<30} {:<6} {:>12}",
        "ID", "TÍTULO", "AUTOR", "ANO", "PREÇO"
    );
    println!("{}", "-".repeat(97));
    for book in books {
        println!(
            "{:<5} {:<40} {:<30} {:<6} {:>12}",
            book.id.map(|id| id.to_string()).unwrap_or_default(),
            truncate(&book.title, 40),
            truncate(&book.author, 30),
            book.year,
            format!("R$ {:.2}", book.price)
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn backups(config: &Config) -> usize {
        fs::read_dir(config.backup_dir()).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn test_import_missing_file_takes_no_backup() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path());

        assert!(cmd_import(&config, &dir.path().join("digitado_errado.csv")).is_err());
        assert_eq!(backups(&config), 0);
    }

    #[test]
    fn test_import_backs_up_then_inserts() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path());
        let input = dir.path().join("planilha.csv");
        fs::write(&input, "titulo;autor;ano;preco\nIracema;José de Alencar;1865;19,90\n").unwrap();

        cmd_import(&config, &input).unwrap();
        assert_eq!(backups(&config), 1);
        assert_eq!(CatalogStore::open(config.store_path()).unwrap().len(), 1);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Iracema", 10), "Iracema");
        assert_eq!(truncate("Memórias Póstumas", 8), "Memória…");
    }
}
