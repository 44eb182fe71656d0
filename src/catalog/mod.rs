//! # Test Catalog
//!
//! The fixed list of SCIM2 test groups and their sub-tests, plus the table
//! that binds each selectable check to the key the compliance suite expects in
//! the run request. Adding an operation means extending both [`CATALOG`] and
//! [`PAYLOAD_BINDINGS`]; [`validate_bindings`] refuses to start the console if
//! the two drift apart.

use std::collections::HashSet;

use crate::error::CatalogError;

/// A sub-test as declared in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTestSpec {
    pub name: &'static str,
    pub state_name: &'static str,
}

/// A test group as declared in the catalog. Ids are 1-based and stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub id: u32,
    pub name: &'static str,
    pub sub: &'static [SubTestSpec],
}

const fn sub(name: &'static str, state_name: &'static str) -> SubTestSpec {
    SubTestSpec { name, state_name }
}

pub const CATALOG: &[GroupSpec] = &[
    GroupSpec {
        id: 1,
        name: "/ServiceProviderConfig",
        sub: &[sub("GET /ServiceProviderConfig", "serviceProviderConfigGet")],
    },
    GroupSpec {
        id: 2,
        name: "/Schemas",
        sub: &[sub("GET /Schemas", "schemasGet")],
    },
    GroupSpec {
        id: 3,
        name: "/ResourceTypes",
        sub: &[sub("GET /ResourceTypes", "resourceTypesGet")],
    },
    GroupSpec {
        id: 4,
        name: "/Users",
        sub: &[
            sub("GET /Users", "userGet"),
            sub("GET /Users/{id}", "userGetById"),
            sub("POST /Users", "userPost"),
            sub("PUT /Users/{id}", "userPut"),
            sub("PATCH /Users/{id}", "userPatch"),
            sub("DELETE /Users/{id}", "userDelete"),
            sub("POST /Users/.search", "userSearch"),
        ],
    },
    GroupSpec {
        id: 5,
        name: "/Groups",
        sub: &[
            sub("GET /Groups", "groupGet"),
            sub("GET /Groups/{id}", "groupGetById"),
            sub("POST /Groups", "groupPost"),
            sub("PUT /Groups/{id}", "groupPut"),
            sub("PATCH /Groups/{id}", "groupPatch"),
            sub("DELETE /Groups/{id}", "groupDelete"),
            sub("POST /Groups/.search", "groupSearch"),
        ],
    },
    GroupSpec {
        id: 6,
        name: "/Me",
        sub: &[
            sub("GET /Me", "meGet"),
            sub("POST /Me", "mePost"),
            sub("PUT /Me", "mePut"),
            sub("PATCH /Me", "mePatch"),
            sub("DELETE /Me", "meDelete"),
        ],
    },
    GroupSpec {
        id: 7,
        name: "/Bulk",
        sub: &[
            sub("POST /Bulk", "bulkPost"),
            sub("PUT /Bulk", "bulkPut"),
            sub("PATCH /Bulk", "bulkPatch"),
            sub("DELETE /Bulk", "bulkDelete"),
        ],
    },
];

/// Where a payload boolean reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// The group's own `checked` flag. Only valid for single-sub-test groups.
    Group { group_id: u32, state_name: &'static str },
    /// One sub-test, by position within its group.
    SubTest {
        group_id: u32,
        index: usize,
        state_name: &'static str,
    },
}

impl PayloadSource {
    pub fn state_name(&self) -> &'static str {
        match *self {
            PayloadSource::Group { state_name, .. } | PayloadSource::SubTest { state_name, .. } => {
                state_name
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadBinding {
    pub key: &'static str,
    pub source: PayloadSource,
}

const fn group(key: &'static str, group_id: u32, state_name: &'static str) -> PayloadBinding {
    PayloadBinding {
        key,
        source: PayloadSource::Group { group_id, state_name },
    }
}

const fn sub_test(
    key: &'static str,
    group_id: u32,
    index: usize,
    state_name: &'static str,
) -> PayloadBinding {
    PayloadBinding {
        key,
        source: PayloadSource::SubTest {
            group_id,
            index,
            state_name,
        },
    }
}

/// Request keys in the order the compliance suite documents them.
pub const PAYLOAD_BINDINGS: &[PayloadBinding] = &[
    group("getServiceProviderConfig", 1, "serviceProviderConfigGet"),
    group("getSchemas", 2, "schemasGet"),
    group("getResourceTypes", 3, "resourceTypesGet"),
    sub_test("getUsers", 4, 0, "userGet"),
    sub_test("getUserById", 4, 1, "userGetById"),
    sub_test("postUser", 4, 2, "userPost"),
    sub_test("putUser", 4, 3, "userPut"),
    sub_test("patchUser", 4, 4, "userPatch"),
    sub_test("deleteUser", 4, 5, "userDelete"),
    sub_test("searchUser", 4, 6, "userSearch"),
    sub_test("getGroups", 5, 0, "groupGet"),
    sub_test("getGroupById", 5, 1, "groupGetById"),
    sub_test("postGroup", 5, 2, "groupPost"),
    sub_test("putGroup", 5, 3, "groupPut"),
    sub_test("patchGroup", 5, 4, "groupPatch"),
    sub_test("deleteGroup", 5, 5, "groupDelete"),
    sub_test("searchGroup", 5, 6, "groupSearch"),
    sub_test("getMe", 6, 0, "meGet"),
    sub_test("postMe", 6, 1, "mePost"),
    sub_test("putMe", 6, 2, "mePut"),
    sub_test("patchMe", 6, 3, "mePatch"),
    sub_test("deleteMe", 6, 4, "meDelete"),
    sub_test("postBulk", 7, 0, "bulkPost"),
    sub_test("putBulk", 7, 1, "bulkPut"),
    sub_test("patchBulk", 7, 2, "bulkPatch"),
    sub_test("deleteBulk", 7, 3, "bulkDelete"),
];

/// Checks that every binding points at the sub-test it claims to, and that
/// every sub-test in the catalog is bound exactly once.
pub fn validate_bindings(
    catalog: &[GroupSpec],
    bindings: &[PayloadBinding],
) -> Result<(), CatalogError> {
    let mut keys = HashSet::new();
    let mut bound = HashSet::new();

    for binding in bindings {
        if !keys.insert(binding.key) {
            return Err(CatalogError::DuplicateKey(binding.key));
        }

        let (group_id, index) = match binding.source {
            PayloadSource::Group { group_id, .. } => (group_id, 0),
            PayloadSource::SubTest { group_id, index, .. } => (group_id, index),
        };

        let group = catalog
            .iter()
            .find(|group| group.id == group_id)
            .ok_or(CatalogError::UnknownGroup {
                key: binding.key,
                group_id,
            })?;

        if matches!(binding.source, PayloadSource::Group { .. }) && group.sub.len() != 1 {
            return Err(CatalogError::GroupNotSingular {
                key: binding.key,
                group_id,
            });
        }

        let spec = group.sub.get(index).ok_or(CatalogError::UnknownSubTest {
            key: binding.key,
            group_id,
            index,
        })?;

        let expected = binding.source.state_name();
        if spec.state_name != expected {
            return Err(CatalogError::StateNameMismatch {
                key: binding.key,
                expected,
                found: spec.state_name.to_string(),
            });
        }

        if !bound.insert((group_id, index)) {
            return Err(CatalogError::DuplicateKey(binding.key));
        }
    }

    for group in catalog {
        for (index, spec) in group.sub.iter().enumerate() {
            if !bound.contains(&(group.id, index)) {
                return Err(CatalogError::Unbound {
                    state_name: spec.state_name.to_string(),
                });
            }
        }
    }

    Ok(())
}
