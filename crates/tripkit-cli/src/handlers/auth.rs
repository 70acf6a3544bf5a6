//! Session command handlers

use super::{with_spinner, Session};
use crate::cli::{LoginArgs, RegisterArgs};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use tripkit_core::{LoginRequest, RegisterRequest};

pub async fn handle_login(args: LoginArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let request = LoginRequest {
        email: args.email,
        password: args.password,
    };

    let signed_in = with_spinner(output, "Signing in", session.store.auth().login(&request)).await?;
    tracing::info!(user = %signed_in.user.id, "Signed in");

    output.success(&format!("Signed in as {} <{}>", signed_in.user.name, signed_in.user.email))?;
    if !output.is_human() {
        output.record(&signed_in.user)?;
    }
    Ok(())
}

pub async fn handle_register(args: RegisterArgs, session: &Session, output: &mut OutputWriter) -> Result<()> {
    let request = RegisterRequest {
        name: args.name,
        email: args.email,
        password: args.password,
    };

    let registered = with_spinner(output, "Creating account", session.store.auth().register(&request)).await?;

    output.success(&format!("Welcome, {}! You are signed in.", registered.user.name))?;
    if !output.is_human() {
        output.record(&registered.user)?;
    }
    Ok(())
}

pub async fn handle_logout(session: &Session, output: &mut OutputWriter) -> Result<()> {
    if !session.api.has_session() {
        output.info("Not signed in")?;
        return Ok(());
    }

    session.store.auth().logout().await?;
    output.success("Signed out")
}

pub async fn handle_whoami(session: &Session, output: &mut OutputWriter) -> Result<()> {
    session.require_sign_in()?;

    match session.store.auth().restore().await? {
        Some(user) => output.record(&user),
        None => Err(Error::NotSignedIn),
    }
}
