//! Good News client.
//!
//! With the `gui` feature the feed opens in a webview window. Without it, a
//! console session loads the first pages, prints each card, and marks them read.

#[cfg(feature = "gui")]
fn main() {
    env_logger::init();
    goodnews::ui::webview_app::run();
}

#[cfg(not(feature = "gui"))]
#[tokio::main]
async fn main() -> std::process::ExitCode {
    use std::process::ExitCode;
    use std::sync::Arc;

    use goodnews::app::App;
    use goodnews::services::local_store::LocalStore;
    use goodnews::services::settings_engine::load_client_settings;
    use goodnews::ui::feed::FIRST_CLIENT_PAGE;
    use goodnews::ui::notice::ConsoleNotifier;

    env_logger::init();

    let settings = load_client_settings();
    let store = match LocalStore::open(None) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Cannot open local storage: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let app = match App::connect(settings, Arc::new(ConsoleNotifier), store) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Cannot build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    println!("  Good News v{} @ {}", env!("CARGO_PKG_VERSION"), app.settings.base_url);
    println!("  Theme: {}", app.theme.lock().preference().as_str());
    println!();

    if let Err(e) = app.load_first_page().await {
        eprintln!("Could not load the feed: {}", e);
        return ExitCode::FAILURE;
    }
    match app.pager.load_more().await {
        Ok(outcome) => println!("  Page {}: {}", FIRST_CLIENT_PAGE, outcome),
        Err(e) => eprintln!("  Page {} failed: {}", FIRST_CLIENT_PAGE, e),
    }

    for card in app.feed.cards() {
        let likes = card.like.view();
        let happiness = card.happiness.view();
        println!("  #{} {}", card.article_id(), card.title());
        println!("      {} {}", if likes.liked() { "♥" } else { "♡" }, likes.summary());
        println!(
            "      {} {}% · {}",
            happiness.emoji(),
            happiness.display(),
            happiness.count_text()
        );
        println!("      💬 {}", card.comments.view().count());
    }
    println!();
    println!("  [{}]", app.pager.button().label);

    let report = app.mark_read_after_dwell().await;
    println!("  Marked {} article(s) read ({} failed)", report.marked, report.failed);
    ExitCode::SUCCESS
}
