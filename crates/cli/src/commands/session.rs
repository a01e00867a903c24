//! Sign-in commands.
//!
//! Identity is issued by the external auth provider; `bh login` only records
//! the customer id it handed over so later commands can act as that customer.

use bookhub_storefront::session::{AuthProvider, SessionUser};

use super::Context;

/// Clap value parser for customer ids: trimmed, never blank.
///
/// # Errors
///
/// Returns a message if `value` is empty or only whitespace.
pub fn parse_user_id(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("user id must not be blank".to_owned());
    }
    Ok(trimmed.to_owned())
}

#[allow(clippy::print_stdout)]
pub fn login(ctx: &mut Context, user_id: String, email: Option<String>) {
    let mut user = SessionUser::new(user_id);
    if let Some(email) = email {
        user = user.with_email(email);
    }
    ctx.state.session_mut().sign_in(user);

    if let Some(user) = ctx.state.session().current_user() {
        match &user.email {
            Some(email) => println!("Signed in as {} <{email}>", user.id),
            None => println!("Signed in as {}", user.id),
        }
    }
}

#[allow(clippy::print_stdout)]
pub fn logout(ctx: &mut Context) {
    ctx.state.session_mut().sign_out();
    println!("Signed out");
}
