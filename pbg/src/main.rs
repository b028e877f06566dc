mod command;
mod config;
mod controller;
mod fetch;
mod gallery;
mod lightbox;
mod notify;
mod sanitize;
mod session;
mod trigger;
mod util;

use crate::command::{Command, HELP};
use crate::config::read_config;
use crate::controller::{Controller, Ticket};
use crate::fetch::Fetch;
use crate::notify::{Notify, Terminal};
use anyhow::{Context, Result};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use pixabay::SearchResponse;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, stdin};
use tokio::sync::oneshot;
use tokio::time::{Instant, sleep_until};

#[macro_use]
extern crate log;

async fn fetch_ticket<F: Fetch>(
    api: &F,
    ticket: Ticket,
) -> (Ticket, pixabay::Result<SearchResponse>) {
    let r = api.fetch(&ticket.url).await;
    (ticket, r)
}

async fn dump<N: Notify>(app: &Controller<N>, path: &Path) -> Result<()> {
    let doc = app.document();
    fs::write(path, &doc)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!("written {} bytes into {:?}", doc.len(), path);
    Ok(())
}

fn show_image<N: Notify>(app: &mut Controller<N>, url: Option<String>) {
    let Some(url) = url else {
        app.notifier.warning("No such image");
        return;
    };
    if let Some(lb) = app.lightbox() {
        let i = lb.position().unwrap_or(0);
        println!("[{}/{}] {}", i + 1, lb.len(), url);
    }
}

fn status<N: Notify>(app: &Controller<N>) {
    let s = app.session();
    let g = app.gallery();
    println!(
        "query {:?}, next page {}, {}/{} shown, trigger {:?}{}, scrolled to {:.0}",
        s.query,
        s.page,
        g.len(),
        s.total,
        app.trigger_state(),
        if g.is_loading() { ", loading" } else { "" },
        app.viewport().scroll_top
    );
}

async fn handle<N: Notify>(
    app: &mut Controller<N>,
    cmd: Command,
    output: &Path,
) -> Option<Ticket> {
    let now = Instant::now();
    match cmd {
        Command::Search(q) => return app.submit(&q),
        Command::Scroll(_) | Command::End if app.gallery().is_empty() => {
            app.notifier.warning("Nothing to scroll");
        }
        Command::Scroll(rows) => app.scroll_by(rows, now),
        Command::End => app.scroll_to_end(now),
        Command::Open(i) => {
            let url = app.lightbox().and_then(|lb| lb.open(i)).map(str::to_owned);
            show_image(app, url);
        }
        Command::Next => {
            let url = app.lightbox().and_then(|lb| lb.next()).map(str::to_owned);
            show_image(app, url);
        }
        Command::Prev => {
            let url = app.lightbox().and_then(|lb| lb.prev()).map(str::to_owned);
            show_image(app, url);
        }
        Command::Close => {
            if let Some(lb) = app.lightbox() {
                lb.close();
            }
        }
        Command::Save(path) => {
            if let Err(e) = dump(app, path.as_deref().unwrap_or(output)).await {
                error!("save failed: {:?}", e);
                app.notifier.failure("Could not save the gallery");
            }
        }
        Command::Status => status(app),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    None
}

/// Feeds input lines to the controller until quit, end of input or
/// `shutdown`, then writes the gallery page to `output`.
async fn run<N, F, R>(
    app: &mut Controller<N>,
    api: &F,
    input: R,
    mut shutdown: oneshot::Receiver<()>,
    output: &Path,
) -> Result<()>
where
    N: Notify,
    F: Fetch,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut in_flight = FuturesUnordered::new();
    loop {
        let deadline = app.deadline();
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => {
                        if let Some(ticket) = handle(app, cmd, output).await {
                            in_flight.push(fetch_ticket(api, ticket));
                        }
                    }
                    Err(e) => app.notifier.warning(&e),
                },
                Ok(None) => {
                    info!("end of input");
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("skipping unreadable line: {}", e);
                    app.notifier.warning("Input is not valid UTF-8");
                }
                Err(e) => {
                    error!("reading input: {}", e);
                    break;
                }
            },
            Some((ticket, r)) = in_flight.next(), if !in_flight.is_empty() => {
                app.complete(ticket, r);
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(ticket) = app.poll(Instant::now()) {
                    in_flight.push(fetch_ticket(api, ticket));
                }
            }
            _ = &mut shutdown => break,
        }
    }

    if !in_flight.is_empty() {
        warn!("abandoning {} pending requests", in_flight.len());
    }
    dump(app, output).await
}

fn init_logger() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filter)
        .try_init()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logger()?;

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| "config.json".into());
    let conf = read_config(&path)?;
    info!(
        "pbg {}: {} per page, {:?} trigger, debounce {:?}, output {:?}",
        env!("CARGO_PKG_VERSION"),
        conf.per_page,
        conf.strategy,
        conf.debounce,
        conf.output
    );
    let api = pixabay::Client::with_options(conf.key.clone(), &conf.client_options())?;
    let mut app = Controller::new(conf.settings()?, Terminal::new(conf.color));

    let (tx, rx) = oneshot::channel();
    let mut tx = Some(tx);
    ctrlc::set_handler(move || match tx.take() {
        Some(tx) => {
            if tx.send(()).is_err() {
                error!("failed to invoke shutdown");
            } else {
                warn!("shutting down");
            }
        }
        None => {
            warn!("is shutting down");
        }
    })?;

    println!("Type a query to search, /help for commands.");
    run(&mut app, &api, BufReader::new(stdin()), rx, &conf.output).await?;
    info!("bye");
    Ok(())
}
