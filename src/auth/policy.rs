use crate::database::models::user::Role;

/// Operations gated by the authorization policy. Reads are public and never
/// pass through here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateAuction,
    DeleteAuction,
    UpdateAuction,
    CreateItem,
    DeleteItem,
    UpdateItem,
}

/// Single authorization decision point. Handlers call this instead of
/// comparing role strings inline.
pub fn can_perform(role: Role, action: Action) -> bool {
    match action {
        // Auction lifecycle is administrative
        Action::CreateAuction | Action::DeleteAuction | Action::UpdateAuction => {
            role == Role::Admin
        }
        // Any authenticated user manages items
        Action::CreateItem | Action::DeleteItem | Action::UpdateItem => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_manage_auctions() {
        assert!(can_perform(Role::Admin, Action::CreateAuction));
        assert!(can_perform(Role::Admin, Action::DeleteAuction));
        assert!(can_perform(Role::Admin, Action::UpdateAuction));
    }

    #[test]
    fn client_cannot_manage_auctions() {
        assert!(!can_perform(Role::Client, Action::CreateAuction));
        assert!(!can_perform(Role::Client, Action::DeleteAuction));
        assert!(!can_perform(Role::Client, Action::UpdateAuction));
    }

    #[test]
    fn any_role_can_manage_items() {
        for role in [Role::Client, Role::Admin] {
            assert!(can_perform(role, Action::CreateItem));
            assert!(can_perform(role, Action::DeleteItem));
            assert!(can_perform(role, Action::UpdateItem));
        }
    }
}
