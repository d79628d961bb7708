use clap::Subcommand;
use std::io::{self, BufRead, Write};
use taskflow_core::auth::{LoginRequest, RegisterRequest};

use super::{context, flush, CmdResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Status,
}

pub async fn run(action: AuthAction) -> CmdResult {
    let ctx = context()?;
    match action {
        AuthAction::Login { email, password } => {
            let password = password_or_prompt(password)?;
            let mut auth = ctx.auth();
            let result = auth.login(LoginRequest { email, password }).await;
            flush(ctx.notifier());
            let session = result?;
            println!("Signed in as {} <{}>", session.user.name, session.user.email);
        }
        AuthAction::Register {
            name,
            email,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let mut auth = ctx.auth();
            let result = auth.register(RegisterRequest { name, email, password }).await;
            flush(ctx.notifier());
            let session = result?;
            println!("Signed in as {} <{}>", session.user.name, session.user.email);
        }
        AuthAction::Logout => {
            let notifier = ctx.notifier().clone();
            let mut auth = ctx.auth();
            auth.logout()?;
            flush(&notifier);
            ctx.sign_out()?;
        }
        AuthAction::Status => match ctx.current_user()? {
            Some(user) => println!("signed in as {} <{}> (id {})", user.name, user.email, user.id),
            None => println!("not signed in"),
        },
    }
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> io::Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
