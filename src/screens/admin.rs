// Site admin screen: sign in with the site password, then create teams.
use log::info;

use super::{Operation, Route, ScreenStatus};
use crate::client::{Backend, ClientError};
use crate::models::{AdminLoginRequest, CreateTeamRequest, CreatedTeam};
use crate::session::{AuthEvent, AuthGate, AuthScope};

pub struct AdminScreen<B> {
    backend: B,
    gate: AuthGate,
    status: ScreenStatus,
    pub team_name: String,
    created: Option<CreatedTeam>,
}

impl<B: Backend> AdminScreen<B> {
    pub fn new(backend: B) -> Self {
        AdminScreen {
            backend,
            gate: AuthGate::new(AuthScope::SiteAdmin),
            status: ScreenStatus::default(),
            team_name: String::new(),
            created: None,
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub async fn sign_in(&mut self, password: &str) -> Result<(), ClientError> {
        if password.is_empty() {
            return self
                .status
                .reject(Operation::SignIn, ClientError::Validation("Admin password is required".into()));
        }

        self.status.begin(Operation::SignIn)?;
        if let Err(err) = self.gate.apply(AuthEvent::Submit(password.to_string())) {
            return self.status.settle(Operation::SignIn, Err(err.into()));
        }

        let request = AdminLoginRequest {
            admin_password: password.to_string(),
        };
        let result = self.backend.admin_login(&request).await;
        let result = self.status.settle(Operation::SignIn, result);

        match result {
            Ok(_) => {
                self.gate.apply(AuthEvent::Accepted)?;
                info!("Site admin signed in");
                Ok(())
            }
            Err(err) => {
                self.gate
                    .apply(AuthEvent::Rejected(err.user_message(Operation::SignIn.fallback())))?;
                Err(err)
            }
        }
    }

    /// Creates a team from `team_name`. The passwords are only ever shown here.
    pub async fn create_team(&mut self) -> Result<&CreatedTeam, ClientError> {
        if !self.gate.is_authenticated() {
            return self.status.reject(
                Operation::CreateTeam,
                ClientError::Unauthorized("Sign in as site admin first".into()),
            );
        }

        let name = self.team_name.trim().to_string();
        if name.is_empty() {
            return self
                .status
                .reject(Operation::CreateTeam, ClientError::Validation("Team name is required".into()));
        }

        self.status.begin(Operation::CreateTeam)?;
        let result = self.backend.create_team(&CreateTeamRequest { name }).await;
        let created = self.status.settle(Operation::CreateTeam, result)?;

        info!("Created team {}", created.team_id);
        self.team_name.clear();
        let created: &CreatedTeam = self.created.insert(created);
        Ok(created)
    }

    pub fn created_team(&self) -> Option<&CreatedTeam> {
        self.created.as_ref()
    }

    /// Hides the passwords once they have been noted down.
    pub fn take_created_team(&mut self) -> Option<CreatedTeam> {
        self.created.take()
    }

    pub fn team_edit_route(&self) -> Option<Route> {
        self.created.as_ref().map(|team| Route::TeamEdit(team.team_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalBackend;
    use crate::session::AuthState;
    use crate::utils::team_storage::{StoreSettings, TeamStore};

    fn screen() -> AdminScreen<LocalBackend> {
        AdminScreen::new(LocalBackend::new(TeamStore::new(StoreSettings {
            site_admin_password: Some("root".to_string()),
            bcrypt_cost: 4,
        })))
    }

    #[actix_rt::test]
    async fn wrong_password_leaves_an_error() {
        let mut screen = screen();

        let err = screen.sign_in("nope").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(screen.gate().state(), &AuthState::Error("Wrong admin password".into()));
        assert_eq!(screen.status().error(), Some("Wrong admin password"));

        screen.sign_in("root").await.unwrap();
        assert!(screen.gate().is_authenticated());
        assert_eq!(screen.status().error(), None);
    }

    #[actix_rt::test]
    async fn create_team_requires_sign_in_and_a_name() {
        let mut screen = screen();
        screen.team_name = "Kitchen".into();
        assert!(screen.create_team().await.is_err());

        screen.sign_in("root").await.unwrap();
        screen.team_name = "   ".into();
        assert!(matches!(screen.create_team().await, Err(ClientError::Validation(_))));

        screen.team_name = "Kitchen".into();
        let created = screen.create_team().await.unwrap().clone();
        assert_eq!(created.team_password.len(), 8);
        assert_eq!(created.admin_password.len(), 10);
        assert!(screen.team_name.is_empty());
        assert_eq!(screen.team_edit_route(), Some(Route::TeamEdit(created.team_id)));

        assert_eq!(screen.take_created_team(), Some(created));
        assert_eq!(screen.created_team(), None);
    }
}
