//! Interactive line-based shell.
//!
//! Each line is one user action. After every action the screen (notification,
//! user line, creation form, post list) is printed again. Posts are addressed
//! by their position in the displayed list or by id.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use bloglist_core::app::App;
use bloglist_core::config::Config;
use bloglist_core::storage::Storage;

use crate::cli::commands::{confirm, open_app};
use crate::render;

const HELP: &str = "\
commands:
  list                      show the list again
  refresh                   fetch the list from the server
  view <n> | hide <n>       expand or collapse a blog
  like <n>                  like a blog
  remove <n>                remove a blog you created
  new                       open the creation form
  title <text>              set the form title
  url <text>                set the form url
  submit                    create the blog
  cancel                    close the creation form
  login <username> <password>
  logout
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    List,
    Refresh,
    Toggle(String),
    Like(String),
    Remove(String),
    OpenForm,
    Title(String),
    Url(String),
    Submit,
    Cancel,
    Login { username: String, password: String },
    Logout,
    Help,
    Quit,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let target = |name: &str| {
            if rest.is_empty() {
                Err(format!("usage: {name} <n>"))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "list" | "ls" => Ok(Self::List),
            "refresh" => Ok(Self::Refresh),
            "view" | "hide" => target(word).map(Self::Toggle),
            "like" => target(word).map(Self::Like),
            "remove" | "rm" => target(word).map(Self::Remove),
            "new" => Ok(Self::OpenForm),
            "title" => Ok(Self::Title(rest.to_string())),
            "url" => Ok(Self::Url(rest.to_string())),
            "submit" | "create" => Ok(Self::Submit),
            "cancel" => Ok(Self::Cancel),
            "login" => match rest.split_once(char::is_whitespace) {
                Some((username, password)) => Ok(Self::Login {
                    username: username.to_string(),
                    password: password.trim().to_string(),
                }),
                None => Err("usage: login <username> <password>".to_string()),
            },
            "logout" => Ok(Self::Logout),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Ok(Self::List),
            other => Err(format!("unknown command: {other} (try help)")),
        }
    }
}

/// Resolves a displayed position (1-based) or a raw id to a post id.
fn resolve_target<S: Storage>(app: &App<S>, target: &str) -> Option<String> {
    let sorted = app.sorted_posts();
    if let Ok(position) = target.parse::<usize>()
        && let Some(post) = position.checked_sub(1).and_then(|i| sorted.get(i))
    {
        return Some(post.id.clone());
    }
    app.state.posts.get(target).map(|post| post.id.clone())
}

pub async fn run(config: &Config) -> Result<()> {
    let mut app = open_app(config)?;
    let startup = app.start().await;
    if !startup.fetched {
        println!("Could not reach {}.", app.client().base_url());
    }
    print!("{}", render::screen(&app));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        app.tick();

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        if !execute(&mut app, command).await? {
            break;
        }
        print!("{}", render::screen(&app));
    }

    Ok(())
}

/// Runs one command. Returns false when the shell should exit.
async fn execute<S: Storage>(app: &mut App<S>, command: ShellCommand) -> Result<bool> {
    match command {
        ShellCommand::Quit => return Ok(false),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::List => {}
        ShellCommand::Refresh => {
            if !app.fetch_posts().await {
                println!("Could not reach {}.", app.client().base_url());
            }
        }
        ShellCommand::Toggle(target) => match resolve_target(app, &target) {
            Some(id) => {
                app.toggle_details(&id);
            }
            None => println!("no blog {target}"),
        },
        ShellCommand::Like(target) => match resolve_target(app, &target) {
            Some(id) if app.current_user().is_some() => {
                app.like(&id).await;
            }
            Some(_) => println!("log in to like blogs"),
            None => println!("no blog {target}"),
        },
        ShellCommand::Remove(target) => {
            let Some(id) = resolve_target(app, &target) else {
                println!("no blog {target}");
                return Ok(true);
            };
            let Some(post) = app.state.posts.get(&id) else {
                return Ok(true);
            };
            if !app.controls(post).remove {
                println!("only the creator can remove this blog");
                return Ok(true);
            }
            if let Some(question) = app.remove_prompt(&id)
                && confirm(&question)?
            {
                app.remove(&id).await;
            }
        }
        ShellCommand::OpenForm => {
            if app.current_user().is_some() {
                app.open_form();
            } else {
                println!("log in to create blogs");
            }
        }
        ShellCommand::Title(title) => app.state.blog_form.title = title,
        ShellCommand::Url(url) => app.state.blog_form.url = url,
        ShellCommand::Submit => {
            if app.state.form_open {
                app.submit_blog().await;
            } else {
                println!("open the form with `new` first");
            }
        }
        ShellCommand::Cancel => app.close_form(),
        ShellCommand::Login { username, password } => {
            app.login_with(&username, &password).await;
        }
        ShellCommand::Logout => app.logout().await,
    }
    Ok(true)
}
