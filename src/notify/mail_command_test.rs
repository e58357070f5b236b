use crate::engine::errors::NotifyError;
use crate::notify::{MailCommandNotifier, Notifier};

// `sh -s <subject> <recipient>` runs the body as a script, which lets the
// tests pick the exit status of the "mail" program.

#[tokio::test]
async fn test_mail_command_success() {
    let notifier = MailCommandNotifier::new("sh");
    let result = notifier.send("ops@example.com", "subject", "exit 0\n").await;
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn test_mail_command_nonzero_exit() {
    let notifier = MailCommandNotifier::new("sh");
    let result = notifier
        .send("ops@example.com", "subject", "echo broken >&2; exit 3\n")
        .await;
    match result {
        Err(NotifyError::Command(msg)) => assert!(msg.contains("broken"), "{msg}"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_mail_command_missing_program() {
    let notifier = MailCommandNotifier::new("/nonexistent/mail-binary");
    let result = notifier.send("ops@example.com", "subject", "body").await;
    assert!(matches!(result, Err(NotifyError::Io(_))));
}
