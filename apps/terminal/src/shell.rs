use anyhow::{anyhow, bail, Context, Result};
use app_core::{
    relative_day_label, screens::ProfileScreen, AppController, ImageSource, RecipeListView, Route,
    Tab,
};
use chrono::Utc;
use shared::{
    domain::{Difficulty, ProductId, RecipeId},
    error::AppError,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::picker::ShellPicker;

const HELP: &str = "\
Команды:
  login <email> <пароль>              вход
  signup                              экран регистрации
  register <имя> <email> <пароль>     регистрация
  back                                назад
  tab <home|history|profile>          вкладка
  photo [путь] | gallery [путь]       выбрать фото
  clear                               убрать фото
  recognize                           распознать продукты
  retry                               повторить запрос
  remove <id>                         убрать продукт
  generate                            подобрать рецепты
  search [текст]                      поиск по названию
  difficulty <легко|средне|сложно>    фильтр по сложности
  open <id>                           открыть рецепт
  cook | cooked                       начать готовить | приготовил
  next | prev | close                 шаги готовки
  notifications                       уведомления вкл/выкл
  logout | confirm | cancel           выход из аккаунта
  dismiss                             закрыть уведомление
  show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Login { email: String, password: String },
    SignUp,
    Register { name: String, email: String, password: String },
    Back,
    Tab(Tab),
    Pick { source: ImageSource, uri: Option<String> },
    Clear,
    Recognize,
    Retry,
    Remove(ProductId),
    Generate,
    Search(String),
    Difficulty(Difficulty),
    Open(RecipeId),
    Cook,
    Next,
    Prev,
    Cooked,
    Close,
    Notifications,
    Logout,
    Confirm,
    Cancel,
    Dismiss,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match word.to_lowercase().as_str() {
            "login" => match args.as_slice() {
                [email, password] => ShellCommand::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => bail!("usage: login <email> <password>"),
            },
            "signup" => ShellCommand::SignUp,
            "register" => match args.as_slice() {
                [name, email, password] => ShellCommand::Register {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => bail!("usage: register <name> <email> <password>"),
            },
            "back" => ShellCommand::Back,
            "tab" => {
                let tab = rest.parse::<Tab>().map_err(|err| anyhow!(err))?;
                ShellCommand::Tab(tab)
            }
            "photo" | "camera" => ShellCommand::Pick {
                source: ImageSource::Camera,
                uri: optional(rest),
            },
            "gallery" => ShellCommand::Pick {
                source: ImageSource::Gallery,
                uri: optional(rest),
            },
            "clear" => ShellCommand::Clear,
            "recognize" => ShellCommand::Recognize,
            "retry" => ShellCommand::Retry,
            "remove" => ShellCommand::Remove(ProductId::new(required(rest, "remove <id>")?)),
            "generate" => ShellCommand::Generate,
            "search" => ShellCommand::Search(rest.to_string()),
            "difficulty" => {
                let tier = required(rest, "difficulty <tier>")?
                    .parse::<Difficulty>()
                    .context("unknown difficulty")?;
                ShellCommand::Difficulty(tier)
            }
            "open" => ShellCommand::Open(RecipeId::new(required(rest, "open <id>")?)),
            "cook" => ShellCommand::Cook,
            "next" => ShellCommand::Next,
            "prev" => ShellCommand::Prev,
            "cooked" => ShellCommand::Cooked,
            "close" => ShellCommand::Close,
            "notifications" => ShellCommand::Notifications,
            "logout" => ShellCommand::Logout,
            "confirm" => ShellCommand::Confirm,
            "cancel" => ShellCommand::Cancel,
            "dismiss" | "ok" => ShellCommand::Dismiss,
            "show" | "" => ShellCommand::Show,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => bail!("unknown command '{other}', try 'help'"),
        };
        Ok(command)
    }
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(rest)
}

/// Runs one command. Operation failures become the controller's notice and
/// show up in the next render.
pub async fn execute(
    app: &mut AppController,
    picker: &ShellPicker,
    command: ShellCommand,
) -> Flow {
    let outcome: Result<(), AppError> = match command {
        ShellCommand::Login { email, password } => app.login(&email, &password).await,
        ShellCommand::SignUp => app.open_register(),
        ShellCommand::Register {
            name,
            email,
            password,
        } => app.register(&name, &email, &password).await,
        ShellCommand::Back => app.back(),
        ShellCommand::Tab(tab) => app.select_tab(tab),
        ShellCommand::Pick { source, uri } => {
            picker.stage(uri).await;
            app.pick_image(source).await
        }
        ShellCommand::Clear => app.clear_image(),
        ShellCommand::Recognize => app.recognize().await,
        ShellCommand::Retry => {
            if matches!(app.current_route(), Route::RecipeList(_)) {
                app.retry_recipes().await
            } else {
                app.retry_detection().await
            }
        }
        ShellCommand::Remove(id) => app.remove_product(&id),
        ShellCommand::Generate => app.generate_recipes().await,
        ShellCommand::Search(query) => app.search(&query),
        ShellCommand::Difficulty(tier) => app.toggle_difficulty(tier).map(|_| ()),
        ShellCommand::Open(id) => app.open_recipe(&id),
        ShellCommand::Cook => app.start_cooking(),
        ShellCommand::Next => app.next_step().map(|_| ()),
        ShellCommand::Prev => app.prev_step(),
        ShellCommand::Cooked => app.mark_cooked(),
        ShellCommand::Close => app.close_cooking(),
        ShellCommand::Notifications => app.toggle_notifications().map(|_| ()),
        ShellCommand::Logout => app.request_logout(),
        ShellCommand::Confirm => app.confirm_logout(),
        ShellCommand::Cancel => app.cancel_logout(),
        ShellCommand::Dismiss => {
            app.dismiss_notice();
            Ok(())
        }
        ShellCommand::Show | ShellCommand::Help => Ok(()),
        ShellCommand::Quit => return Flow::Quit,
    };
    if let Err(err) = outcome {
        debug!(code = ?err.code, message = %err.message, "command rejected");
    }
    Flow::Continue
}

pub fn render(app: &AppController) -> String {
    let mut lines: Vec<String> = Vec::new();
    if let Some(notice) = app.notice() {
        lines.push(format!("[{}] {}  (dismiss)", notice.title(), notice.message));
    }

    match app.current_route() {
        Route::Login(form) => {
            lines.push("== Вход ==".into());
            if !form.email.is_empty() {
                lines.push(format!("email: {}", form.email));
            }
            lines.push("login <email> <пароль>  |  signup".into());
        }
        Route::Register(form) => {
            lines.push("== Регистрация ==".into());
            if !form.name.is_empty() || !form.email.is_empty() {
                lines.push(format!("{} {}", form.name, form.email));
            }
            lines.push("register <имя> <email> <пароль>  |  back".into());
        }
        Route::Main(tabs) => {
            let bar: Vec<String> = Tab::ALL
                .iter()
                .map(|tab| {
                    if *tab == tabs.active() {
                        format!("[{}]", tab.label())
                    } else {
                        tab.label().to_string()
                    }
                })
                .collect();
            lines.push(bar.join("  "));
            match tabs.active() {
                Tab::Home => match tabs.home().selected_image() {
                    Some(uri) => {
                        lines.push(format!("Фото: {uri}"));
                        lines.push("recognize  |  clear".into());
                    }
                    None => lines.push("Фото не выбрано: photo [путь] | gallery [путь]".into()),
                },
                Tab::History => {
                    let history = app.history();
                    if history.is_empty() {
                        lines.push("История пуста".into());
                    }
                    let now = Utc::now();
                    lines.extend(history.entries().iter().map(|entry| {
                        format!(
                            "  {}  Приготовлено: {}",
                            entry.recipe_name,
                            relative_day_label(entry.cooked_at, now)
                        )
                    }));
                }
                Tab::Profile => {
                    let (name, email) = ProfileScreen::header(app.session().user());
                    let profile = tabs.profile();
                    lines.push(name);
                    lines.push(email);
                    let state = if profile.notifications() { "ВКЛ" } else { "ВЫКЛ" };
                    lines.push(format!("УВЕДОМЛЕНИЯ: {state}"));
                    if profile.logout_pending() {
                        lines.push("ВЫЙТИ ИЗ АККАУНТА? confirm | cancel".into());
                    }
                    lines.push(format!("V {}", env!("CARGO_PKG_VERSION")));
                }
            }
        }
        Route::RecognizedProducts(screen) => {
            lines.push("== Продукты ==".into());
            if screen.is_loading() {
                lines.push("Распознаём…".into());
            } else if screen.products().is_empty() {
                lines.push("Продуктов нет  (retry | back)".into());
            } else {
                lines.extend(screen.products().iter().map(|product| {
                    format!(
                        "  {}. {} ({:.0}%)",
                        product.id,
                        product.name,
                        product.confidence * 100.0
                    )
                }));
                lines.push("remove <id>  |  generate".into());
            }
        }
        Route::RecipeList(screen) => {
            lines.push("== Рецепты ==".into());
            let filter = screen.filter();
            if filter.is_active() {
                let tier = filter.difficulty().map(Difficulty::label).unwrap_or("любая");
                lines.push(format!("поиск: '{}'  сложность: {tier}", filter.query()));
            }
            match screen.visible() {
                RecipeListView::Loading => lines.push("Подбираем рецепты…".into()),
                RecipeListView::Empty => lines.push("Ничего не найдено".into()),
                RecipeListView::Recipes(recipes) => {
                    lines.extend(recipes.iter().map(|recipe| {
                        format!(
                            "  {}. {}  ⏱ {}  {}",
                            recipe.id,
                            recipe.name,
                            recipe.time_estimate,
                            recipe.difficulty.label()
                        )
                    }));
                }
            }
        }
        Route::RecipeDetail(screen) => {
            let recipe = screen.recipe();
            lines.push(format!("== {} ==", recipe.name));
            lines.push(format!("⏱ {}  {}", recipe.time_estimate, recipe.difficulty.label()));
            lines.push("Ингредиенты:".into());
            lines.extend(screen.ingredient_rows().into_iter().map(|row| {
                let marker = if row.missing { " (нет в наличии)" } else { "" };
                format!("  • {}{marker}", row.name)
            }));
            lines.push("Приготовление:".into());
            lines.extend(
                screen
                    .instructions()
                    .iter()
                    .enumerate()
                    .map(|(index, step)| format!("  {}. {step}", index + 1)),
            );
            lines.push("cook  |  cooked".into());
        }
        Route::CookingMode(progress) => {
            lines.push(format!("== {} ==", progress.recipe_name()));
            lines.push(format!(
                "Шаг {} из {}",
                progress.index() + 1,
                progress.step_count()
            ));
            lines.push(progress.current_step().to_string());
            let finish = if progress.is_last() { "next (готово)" } else { "next" };
            lines.push(format!("prev  |  {finish}  |  close"));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub async fn run(app: &mut AppController, picker: &ShellPicker) -> Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    stdout.write_all(render(app).as_bytes()).await?;
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                stdout.write_all(format!("{err}\n").as_bytes()).await?;
                continue;
            }
        };
        let show_help = command == ShellCommand::Help;
        if execute(app, picker, command).await == Flow::Quit {
            break;
        }
        if show_help {
            stdout.write_all(format!("{HELP}\n").as_bytes()).await?;
        }
        stdout.write_all(render(app).as_bytes()).await?;
    }
    Ok(())
}
