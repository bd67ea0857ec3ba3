//! Application info: locale, branch, OAuth2 token and signed tickets

use dgs_sdk as sdk;

use super::manager;
use crate::completion;
use crate::error::Result;
use crate::ffi::ffi_call;
use crate::model::{text, OAuth2Token};

manager! {
    /// Application manager
    ApplicationManager => sdk::IDiscordApplicationManager
}

impl ApplicationManager<'_> {
    /// Check that the user owns the game; the client exits the game if not
    pub fn validate_or_exit(&self, completion: impl FnOnce(Result<()>) + 'static) -> Result<()> {
        self.discord.pending().issue("validate_or_exit", completion, |data| {
            ffi_call!(self.handle, validate_or_exit(data, Some(completion::on_result)))
        })
    }

    /// Locale the user's client is set to, for example `en-US`
    pub fn current_locale(&self) -> Result<String> {
        let mut locale: sdk::DiscordLocale = [0; 128];
        ffi_call!(self.handle, get_current_locale(&mut locale))?;
        Ok(text::decode(&locale))
    }

    /// Name of the installed branch of the game
    pub fn current_branch(&self) -> Result<String> {
        let mut branch: Box<sdk::DiscordBranch> = Box::new([0; 4096]);
        ffi_call!(self.handle, get_current_branch(&mut *branch))?;
        Ok(text::decode(&*branch))
    }

    pub fn oauth2_token(&self, completion: impl FnOnce(Result<OAuth2Token>) + 'static) -> Result<()> {
        self.discord.pending().issue("get_oauth2_token", completion, |data| {
            ffi_call!(self.handle, get_oauth2_token(data, Some(completion::on_oauth2_token)))
        })
    }

    /// Signed app ticket proving ownership, decoded as text
    pub fn ticket(&self, completion: impl FnOnce(Result<String>) + 'static) -> Result<()> {
        self.discord.pending().issue("get_ticket", completion, |data| {
            ffi_call!(self.handle, get_ticket(data, Some(completion::on_ticket)))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::testing;

    #[test]
    fn test_locale_and_branch() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            stub.locale = "en-US".to_string();
            stub.branch = "master".to_string();
        });

        let applications = discord.applications().unwrap();
        assert_eq!(applications.current_locale().unwrap(), "en-US");
        assert_eq!(applications.current_branch().unwrap(), "master");
    }

    #[test]
    fn test_oauth2_token() {
        let discord = testing::discord();
        dgs_stub::with(|stub| {
            dgs_stub::set_text(&mut stub.oauth2_token.access_token, "token-abc");
            dgs_stub::set_text(&mut stub.oauth2_token.scopes, "identify");
            stub.oauth2_token.expires = 3600;
        });

        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        discord
            .applications()
            .unwrap()
            .oauth2_token(move |result| *sink.borrow_mut() = Some(result.unwrap()))
            .unwrap();
        discord.run_callbacks().unwrap();

        let token = seen.borrow_mut().take().unwrap();
        assert_eq!(token.access_token(), "token-abc");
        assert_eq!(token.scopes(), "identify");
        assert_eq!(token.expires(), 3600);
    }

    #[test]
    fn test_ticket_and_validate() {
        let discord = testing::discord();
        dgs_stub::with(|stub| stub.ticket = "signed.ticket".to_string());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let applications = discord.applications().unwrap();
        let sink = seen.clone();
        applications
            .ticket(move |result| sink.borrow_mut().push(result.unwrap()))
            .unwrap();
        let sink = seen.clone();
        applications
            .validate_or_exit(move |result| {
                assert!(result.is_ok());
                sink.borrow_mut().push("validated".to_string())
            })
            .unwrap();
        discord.run_callbacks().unwrap();

        assert_eq!(*seen.borrow(), vec!["signed.ticket", "validated"]);
    }
}
