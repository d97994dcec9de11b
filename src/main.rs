use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use steward::assignment::AssignmentRequest;
use steward::authz::labels::RoleLabels;
use steward::authz::role::Role;
use steward::authz::{self, Decision};
use steward::roster::{self, Member, RosterQuery, SortKey};
use steward::session::Viewer;

const MAX_MEMBERS_FILE_SIZE: u64 = 64 * 1024; // 64 KiB

const HELP: &str = "\
commands:
  access <role>            admin area and assignment gates for a role
  can <assigner> <target>  assignment table lookup
  button <viewer> <target> assign affordance visibility
  roles <viewer> [target]  roles the viewer may hand out
  label <role>             display label and badge class
  whoami                   acting user from the session
  load <members.json>      load a member listing
  list [rank] [page]       show the loaded listing as the acting user
  search <text>            filter the loaded listing by name or email
  assign <member-id> <role>
                           evaluate an assignment and print the request body
  help | quit";

/// REPL state. The acting user comes from `STEWARD_SESSION`, never from a default.
struct Shell {
    labels: RoleLabels,
    viewer: Option<Viewer>,
    members: Vec<Member>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Access(Option<Role>),
    Can(Option<Role>, Option<Role>),
    Button(Option<Role>, Option<Role>),
    Roles(Option<Role>, Option<Role>),
    Label(Option<Role>),
    WhoAmI,
    Load(PathBuf),
    List { sort: SortKey, page: usize },
    Search(String),
    Assign { member_id: String, role: Role },
    Help,
    Quit,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("steward=info")),
        )
        .with_target(false)
        .init();

    let labels = match std::env::var_os("STEWARD_LABELS") {
        Some(path) => RoleLabels::load(Path::new(&path))?,
        None => RoleLabels::default(),
    };
    let viewer = std::env::var_os("STEWARD_SESSION")
        .map(|path| Viewer::load(Path::new(&path)))
        .transpose()?;

    let mut shell = Shell {
        labels,
        viewer,
        members: Vec::new(),
    };

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("steward> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line)?;
                match parse_command(line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => match shell.run(command) {
                        Ok(output) => println!("{output}"),
                        Err(e) => eprintln!("error: {e:#}"),
                    },
                    Err(e) => eprintln!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn parse_command(line: &str) -> anyhow::Result<Command> {
    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    let role_at = |i: usize| Role::normalize(args.get(i).copied());

    let command = match (name, args.len()) {
        ("access", 1) => Command::Access(role_at(0)),
        ("can", 2) => Command::Can(role_at(0), role_at(1)),
        ("button", 2) => Command::Button(role_at(0), role_at(1)),
        ("roles", 1 | 2) => Command::Roles(role_at(0), role_at(1)),
        ("label", 1) => Command::Label(role_at(0)),
        ("whoami", 0) => Command::WhoAmI,
        ("load", 1) => Command::Load(PathBuf::from(args[0])),
        ("list", _) => parse_list(&args)?,
        ("search", n) if n > 0 => Command::Search(args.join(" ")),
        ("assign", 2) => Command::Assign {
            member_id: args[0].to_owned(),
            role: args[1].parse()?,
        },
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => bail!("unrecognized command {line:?}, try `help`"),
    };
    Ok(command)
}

fn parse_list(args: &[&str]) -> anyhow::Result<Command> {
    let mut sort = SortKey::Name;
    let mut page = 1;
    for arg in args {
        if arg.eq_ignore_ascii_case("rank") {
            sort = SortKey::Rank;
        } else {
            page = arg
                .parse()
                .with_context(|| format!("page must be a number, got {arg:?}"))?;
        }
    }
    Ok(Command::List { sort, page })
}

/// Read a member listing. Checks file size before reading.
fn load_members(path: &Path) -> anyhow::Result<Vec<Member>> {
    let metadata =
        std::fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    if metadata.len() > MAX_MEMBERS_FILE_SIZE {
        bail!("members file exceeds {MAX_MEMBERS_FILE_SIZE} byte limit");
    }

    let content =
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

fn show(role: Option<Role>) -> String {
    role.map_or_else(|| "(unrecognized)".to_owned(), |r| r.to_string())
}

fn show_list(roles: &[Role]) -> String {
    if roles.is_empty() {
        return "no roles available".to_owned();
    }
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Shell {
    fn run(&mut self, command: Command) -> anyhow::Result<String> {
        let output = match command {
            Command::Access(role) => format!(
                "{}: level {}, admin area {}, assign workflow {}",
                show(role),
                authz::hierarchy_level(role),
                authz::has_admin_access(role),
                authz::can_assign_staff(role),
            ),
            Command::Can(assigner, target) => format!(
                "{} -> {}: {}",
                show(assigner),
                show(target),
                authz::can_assign_role(assigner, target)
            ),
            Command::Button(viewer, target) => format!(
                "{} viewing {}: {}",
                show(viewer),
                show(target),
                authz::should_show_assign_button(viewer, target)
            ),
            Command::Roles(viewer, target) => show_list(&authz::assignable_roles(viewer, target)),
            Command::Label(role) => format!(
                "{} [{}]",
                self.labels.display_name(role),
                self.labels.color_class(role)
            ),
            Command::WhoAmI => {
                let viewer = self.viewer()?;
                format!(
                    "{} ({}) as {}",
                    viewer.id,
                    viewer.name.as_deref().unwrap_or("unnamed"),
                    self.labels.display_name(viewer.role)
                )
            }
            Command::Load(path) => {
                self.members = load_members(&path)?;
                format!("loaded {} members", self.members.len())
            }
            Command::List { sort, page } => {
                let query = RosterQuery {
                    sort,
                    ..RosterQuery::page(page)
                };
                self.render(&query)?
            }
            Command::Search(text) => {
                let query = RosterQuery {
                    search: Some(text),
                    ..RosterQuery::default()
                };
                self.render(&query)?
            }
            Command::Assign { member_id, role } => self.assign(&member_id, role)?,
            Command::Help => HELP.to_owned(),
            Command::Quit => String::new(),
        };
        Ok(output)
    }

    fn viewer(&self) -> anyhow::Result<&Viewer> {
        self.viewer
            .as_ref()
            .context("no session loaded, set STEWARD_SESSION")
    }

    fn render(&self, query: &RosterQuery) -> anyhow::Result<String> {
        let viewer = self.viewer()?;
        let page = roster::view(viewer, &self.members, query, &self.labels);
        let mut lines: Vec<String> = page
            .rows
            .iter()
            .map(|row| {
                format!(
                    "{:>6}  {:<24} {:<14}{}",
                    row.member.id,
                    row.member.name,
                    row.label,
                    if row.show_assign_button { "  [assign]" } else { "" }
                )
            })
            .collect();
        lines.push(format!(
            "{} of {} (offset {})",
            page.rows.len(),
            page.pagination.count,
            page.pagination.offset
        ));
        Ok(lines.join("\n"))
    }

    fn assign(&self, member_id: &str, role: Role) -> anyhow::Result<String> {
        let viewer = self.viewer()?;
        let member = self
            .members
            .iter()
            .find(|m| m.id == member_id)
            .with_context(|| format!("no loaded member with id {member_id:?}"))?;

        let (request, decision) = authz::evaluate(AssignmentRequest::new(viewer, member, role));
        match decision {
            Decision::Allow(grant) => {
                let change = request.submit(grant)?;
                Ok(serde_json::to_string(&change)?)
            }
            Decision::Reject(rejection) => Ok(format!("rejected: {}", rejection.reason())),
        }
    }
}
