//! Insecure legacy cookie layout warning.

use crate::session::locator::is_anonymous_session;

/// Build the advisory warning for an insecure legacy cookie layout.
///
/// `None` when nothing was detected or during a silent internal re-save
/// (refactor mode). Advisory only: loading, saving, and request
/// execution proceed regardless, and the message is emitted at most once
/// per load with no retry or escalation.
pub fn advise(
    insecure_detected: bool,
    refactor_mode: bool,
    bound_host: &str,
    session_id: &str,
) -> Option<String> {
    if !insecure_detected || refactor_mode {
        return None;
    }

    let mut warning = format!(
        "\
Outdated layout detected for the current session. Please consider updating it,
in order to not get affected by potential security problems.

For fixing the current session:

    With binding all cookies to the current host (secure):
        $ sessionjar cli sessions upgrade --bind-cookies {bound_host} {session_id}

    Without binding cookies (leaving them as is) (insecure):
        $ sessionjar cli sessions upgrade {bound_host} {session_id}
"
    );

    if !is_anonymous_session(session_id) {
        warning.push_str(
            "\

For fixing all named sessions:

    With binding all cookies to the current host (secure):
        $ sessionjar cli sessions upgrade-all --bind-cookies

    Without binding cookies (leaving them as is) (insecure):
        $ sessionjar cli sessions upgrade-all
",
        );
    }

    Some(warning)
}
