//! Terminal rendering of the view models and the confirmation prompt.

use std::io::{self, BufRead, Write};

use libdesk::{
    api::HealthStatus,
    models::Book,
    services::{
        catalog::{book_info_label, resolve_cover_url, CatalogPage},
        requests::RequestTable,
        search::SearchView,
        Notice,
    },
    Endpoints,
};

/// Confirmation that asks on stdin unless `--yes` was given
pub fn prompt_confirm(assume_yes: bool) -> impl Fn(&str) -> bool {
    move |prompt: &str| {
        if assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

pub fn print_error(message: &str) {
    eprintln!("error: {}", message);
}

pub fn print_notice(notice: &Notice) {
    if notice.is_error() {
        print_error(&notice.text);
    } else {
        println!("{}", notice.text);
    }
}

pub fn print_catalog(page: &CatalogPage) {
    if let Some(error) = &page.error {
        print_error(error);
    }

    for card in &page.cards {
        println!("[{}] {}", card.id, card.title);
        println!("    {}", card.info);
        for line in [&card.author_line, &card.publisher_line, &card.description]
            .into_iter()
            .flatten()
        {
            println!("    {}", line);
        }
        if let Some(cover) = &card.cover_url {
            println!("    cover: {}", cover);
        }
    }
    println!("{} book(s)", page.cards.len());
}

pub fn print_book(book: &Book, endpoints: &Endpoints) {
    println!("{} (#{})", book.title, book.id);
    println!("  {}", book_info_label(book));
    let fields = [
        ("Author", book.author.as_deref()),
        ("Publisher", book.publisher.as_deref()),
        ("Link", book.link.as_deref()),
        ("Description", book.description.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {}: {}", label, value);
        }
    }
    println!("  Quantity: {}", book.quantity);

    let cover = resolve_cover_url(book.cover.as_deref(), endpoints);
    if !cover.is_empty() {
        println!("  Cover: {}", cover);
    }
}

pub fn print_requests(table: &RequestTable) {
    if let Some(message) = table.empty_message {
        println!("{}", message);
        return;
    }

    for row in &table.rows {
        println!("#{} {} [{}]", row.id, row.book_title, row.status_label);
        println!("    {} <{}> {}", row.user_name, row.user_email, row.grade_section);
        println!("    borrowed {}  return {}", row.borrow_date, row.return_date);
        if !row.actions.is_empty() {
            let actions: Vec<_> = row
                .actions
                .iter()
                .map(|a| format!("{} (libdesk {} {})", a.label, a.action.as_path(), a.request_id))
                .collect();
            println!("    {}", actions.join(", "));
        }
    }
}

pub fn print_search(view: &SearchView) {
    match view {
        SearchView::Idle | SearchView::Searching => {}
        SearchView::Results { header, cards } => {
            println!("{}", header);
            for card in cards {
                println!("({}) {} {}", card.initial, card.title, card.byline);
                if let Some(meta) = &card.meta {
                    println!("    {}", meta);
                }
                println!("    {}", card.description);
                println!("    {}", card.availability.label());
            }
        }
        SearchView::Empty { message, hint } => {
            println!("{}", message);
            println!("{}", hint);
        }
        SearchView::Error { message } => print_error(message),
    }
}

pub fn print_health(health: &HealthStatus) {
    println!("status: {}", health.status.as_deref().unwrap_or("unknown"));
    println!(
        "search engine: {}",
        if health.search_engine_available { "available" } else { "unavailable" }
    );
}
