pub mod admin {
    pub mod user {
        use crate::uac::{Permission, Role, Username};

        #[derive(Debug, serde::Deserialize, Clone)]
        pub struct RoleUpdateReqArgs {
            pub username: Username,
            pub role: Role,
        }

        #[derive(Debug, serde::Deserialize, Clone)]
        pub struct PermissionGrantReqArgs {
            pub username: Username,
            pub permission: Permission,
        }
    }
}

pub mod teams {
    use crate::{
        id::DbId,
        uac::{Role, Username},
    };

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct CreateReqArgs {
        pub name: String,
    }

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct MemberAddReqArgs {
        pub team_id: DbId,
        pub username: Username,
        pub role: Role,
    }

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct MemberRemoveReqArgs {
        pub team_id: DbId,
        pub username: Username,
    }
}

pub mod content {
    use crate::id::DbId;

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct CreateReqArgs {
        pub title: String,
        pub summary: Option<String>,
        /// Team credited with maintaining this entry, if any
        pub team_id: Option<DbId>,
    }

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct ChapterCreateReqArgs {
        pub content_id: DbId,
        /// Team the chapter is uploaded on behalf of; the caller needs at
        /// least the uploader role within it
        pub team_id: DbId,
        pub number: i32,
        pub title: Option<String>,
    }

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct LookupReqArgs {
        pub id: DbId,
    }
}

pub mod uploads {
    use crate::{errors::ConversionError, id::DbId};

    /// Upload category, each with its own MIME allow-list and directory
    #[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum UploadCategory {
        Chapter,
        Content,
        Generic,
    }

    impl UploadCategory {
        pub fn as_str(self) -> &'static str {
            match self {
                UploadCategory::Chapter => "chapter",
                UploadCategory::Content => "content",
                UploadCategory::Generic => "generic",
            }
        }
    }

    impl std::fmt::Display for UploadCategory {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.as_str())
        }
    }

    impl TryFrom<&str> for UploadCategory {
        type Error = ConversionError;

        fn try_from(value: &str) -> Result<Self, Self::Error> {
            match value {
                "chapter" => Ok(UploadCategory::Chapter),
                "content" => Ok(UploadCategory::Content),
                "generic" => Ok(UploadCategory::Generic),
                other => Err(ConversionError::Invalid(format!(
                    "not a known upload category: {other:?}"
                ))),
            }
        }
    }

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct StoreReqArgs {
        pub category: UploadCategory,
        pub id: DbId,
    }

    #[derive(Debug, serde::Deserialize, Clone)]
    pub struct DeleteReqArgs {
        pub category: UploadCategory,
        pub id: DbId,
    }
}
