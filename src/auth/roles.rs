use serde::{Deserialize, Serialize};

/// Account role, stored as the Postgres enum `user_role`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Right {
    GetTodos,
    ManageTodos,
    GetUsers,
    ManageUsers,
}

impl Right {
    pub fn as_str(&self) -> &'static str {
        match self {
            Right::GetTodos => "getTodos",
            Right::ManageTodos => "manageTodos",
            Right::GetUsers => "getUsers",
            Right::ManageUsers => "manageUsers",
        }
    }
}

const USER_RIGHTS: &[Right] = &[Right::GetTodos, Right::ManageTodos];
const ADMIN_RIGHTS: &[Right] = &[
    Right::GetUsers,
    Right::ManageUsers,
    Right::GetTodos,
    Right::ManageTodos,
];

impl Role {
    pub fn rights(&self) -> &'static [Right] {
        match self {
            Role::User => USER_RIGHTS,
            Role::Admin => ADMIN_RIGHTS,
        }
    }

    pub fn has_right(&self, right: Right) -> bool {
        self.rights().contains(&right)
    }
}
