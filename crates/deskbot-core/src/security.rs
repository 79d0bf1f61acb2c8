use crate::domain::UserId;

/// Allow-list membership check for inbound events.
///
/// An empty allow-list rejects everyone; `Config::load` treats that as a fatal
/// startup error, so hitting it here means misconstruction in tests.
pub fn is_authorized(user_id: Option<UserId>, allowed_users: &[i64]) -> bool {
    let Some(user_id) = user_id else {
        return false;
    };
    if allowed_users.is_empty() {
        return false;
    }
    allowed_users.contains(&user_id.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_is_authorized() {
        assert!(is_authorized(Some(UserId(42)), &[1, 42, 7]));
    }

    #[test]
    fn non_member_is_rejected() {
        assert!(!is_authorized(Some(UserId(99)), &[1, 42, 7]));
    }

    #[test]
    fn missing_sender_is_rejected() {
        assert!(!is_authorized(None, &[1]));
    }

    #[test]
    fn empty_allow_list_rejects_everyone() {
        assert!(!is_authorized(Some(UserId(1)), &[]));
    }
}
