//! Fire-and-forget user notifications (toasts).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub kind: NoticeKind,
  pub message: String,
}
impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      kind: NoticeKind::Success,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      kind: NoticeKind::Error,
      message: message.into(),
    }
  }
}

#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
  fn notify(&self, notice: Notice);
}
