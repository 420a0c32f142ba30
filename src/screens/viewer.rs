// Team viewer screen: one day's schedule at a time, read-only.
use chrono::NaiveDate;
use log::info;

use super::{Operation, ScreenStatus};
use crate::client::{Backend, ClientError};
use crate::models::{DaySchedule, EntryId, ScheduleForDateRequest, TaskDetails, TaskDetailsRequest};
use crate::schedule_view::{self, DayView, NavLabels};
use crate::session::{AuthEvent, AuthGate, AuthScope};

pub struct ViewerScreen<B> {
    backend: B,
    gate: AuthGate,
    status: ScreenStatus,
    today: NaiveDate,
    date: NaiveDate,
    day: Option<DaySchedule>,
    view: Option<DayView>,
    popup: Option<TaskDetails>,
}

impl<B: Backend> ViewerScreen<B> {
    /// Starts on `today`; the caller decides what today is.
    pub fn new(backend: B, today: NaiveDate) -> Self {
        ViewerScreen {
            backend,
            gate: AuthGate::new(AuthScope::TeamViewer),
            status: ScreenStatus::default(),
            today,
            date: today,
            day: None,
            view: None,
            popup: None,
        }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn long_date(&self) -> String {
        schedule_view::format_long_date(self.date)
    }

    pub fn team_name(&self) -> Option<&str> {
        self.day.as_ref().map(|day| day.team_name.as_str())
    }

    pub fn view(&self) -> Option<&DayView> {
        self.view.as_ref()
    }

    pub fn popup(&self) -> Option<&TaskDetails> {
        self.popup.as_ref()
    }

    pub fn nav_labels(&self) -> NavLabels {
        schedule_view::nav_labels(self.date, self.today)
    }

    /// The viewer password is checked by loading the current day with it.
    pub async fn sign_in(&mut self, team_password: &str) -> Result<(), ClientError> {
        if team_password.is_empty() {
            return self
                .status
                .reject(Operation::SignIn, ClientError::Validation("Team password is required".into()));
        }

        self.status.begin(Operation::SignIn)?;
        if let Err(err) = self.gate.apply(AuthEvent::Submit(team_password.to_string())) {
            return self.status.settle(Operation::SignIn, Err(err.into()));
        }

        let request = ScheduleForDateRequest {
            team_password: team_password.to_string(),
            date: self.date,
        };
        let result = self.backend.schedule_for_date(&request).await;

        match self.status.settle(Operation::SignIn, result) {
            Ok(day) => {
                self.gate.apply(AuthEvent::Accepted)?;
                info!("Viewer signed in to team {}", day.team_id);
                self.show(day);
                Ok(())
            }
            Err(err) => {
                self.gate
                    .apply(AuthEvent::Rejected(err.user_message(Operation::SignIn.fallback())))?;
                Err(err)
            }
        }
    }

    pub async fn show_date(&mut self, date: NaiveDate) -> Result<&DayView, ClientError> {
        let team_password = match self.gate.credential() {
            Some(password) => password.to_string(),
            None => {
                return self.status.reject(
                    Operation::LoadSchedule,
                    ClientError::Unauthorized("Enter the team password first".into()),
                )
            }
        };

        self.status.begin(Operation::LoadSchedule)?;
        let result = self
            .backend
            .schedule_for_date(&ScheduleForDateRequest { team_password, date })
            .await;
        let day = self.status.settle(Operation::LoadSchedule, result)?;

        self.date = date;
        Ok(self.show(day))
    }

    /// Accepts the `YYYY-MM-DD` value of a date picker.
    pub async fn show_date_str(&mut self, value: &str) -> Result<&DayView, ClientError> {
        match schedule_view::parse_iso_date(value) {
            Ok(date) => self.show_date(date).await,
            Err(_) => self.status.reject(
                Operation::LoadSchedule,
                ClientError::Validation(format!("Not a valid date: {}", value)),
            ),
        }
    }

    pub async fn previous_day(&mut self) -> Result<&DayView, ClientError> {
        self.show_date(schedule_view::previous_day(self.date)).await
    }

    pub async fn next_day(&mut self) -> Result<&DayView, ClientError> {
        self.show_date(schedule_view::next_day(self.date)).await
    }

    pub async fn today(&mut self) -> Result<&DayView, ClientError> {
        self.show_date(self.today).await
    }

    /// Opens the detail popup for an entry. Entries without a description are
    /// inert and yield `Ok(None)` without a request.
    pub async fn select_entry(&mut self, entry_id: EntryId) -> Result<Option<&TaskDetails>, ClientError> {
        let task_id = match self.view.as_ref().and_then(|view| view.entry(entry_id)) {
            Some(entry) if entry.is_selectable() => entry.task_id,
            Some(_) => return Ok(None),
            None => {
                return self.status.reject(
                    Operation::LoadTaskDetails,
                    ClientError::Validation("No such schedule entry".into()),
                )
            }
        };
        let team_password = match self.gate.credential() {
            Some(password) => password.to_string(),
            None => {
                return self.status.reject(
                    Operation::LoadTaskDetails,
                    ClientError::Unauthorized("Enter the team password first".into()),
                )
            }
        };

        self.status.begin(Operation::LoadTaskDetails)?;
        let result = self
            .backend
            .task_details(&TaskDetailsRequest { task_id, team_password })
            .await;
        let details = self.status.settle(Operation::LoadTaskDetails, result)?;

        let details: &TaskDetails = self.popup.insert(details.task);
        Ok(Some(details))
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Forgets the viewer password and everything loaded with it.
    pub fn sign_out(&mut self) -> Result<(), ClientError> {
        self.gate.apply(AuthEvent::SignOut)?;
        self.day = None;
        self.view = None;
        self.popup = None;
        self.date = self.today;
        Ok(())
    }

    fn show(&mut self, day: DaySchedule) -> &DayView {
        self.popup = None;
        let view = DayView::build(&day);
        self.day = Some(day);
        self.view.insert(view)
    }
}
