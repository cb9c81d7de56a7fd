//! Entity metadata, field paths and the per-compilation join registry

use std::collections::HashMap;

/// Table-level metadata for a queryable entity
#[derive(Debug, PartialEq, Eq)]
pub struct EntityDef {
    pub name: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
    /// Selected columns, in the order rows are decoded
    pub columns: &'static [&'static str],
    /// Sortable API field names mapped to columns
    pub sortable: &'static [(&'static str, &'static str)],
}

impl EntityDef {
    /// Column for a sortable API field name
    pub fn sort_column(&self, field: &str) -> Option<&'static str> {
        self.sortable
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ManyToOne,
    OneToMany,
}

/// A named relationship from a root entity to a target entity
///
/// Joined as `target.remote_column = root.local_column`.
#[derive(Debug)]
pub struct Relation {
    pub name: &'static str,
    pub target: &'static EntityDef,
    pub local_column: &'static str,
    pub remote_column: &'static str,
    pub cardinality: Cardinality,
}

impl Relation {
    /// Joining through this relation can repeat root rows
    pub fn fans_out(&self) -> bool {
        self.cardinality == Cardinality::OneToMany
    }
}

/// Where a criteria field lives
#[derive(Debug, Clone, Copy)]
pub enum FieldPath {
    Direct {
        column: &'static str,
    },
    Relation {
        relation: &'static Relation,
        column: &'static str,
    },
}

/// A LEFT JOIN registered during one compilation
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub relation_name: &'static str,
    pub table: &'static str,
    pub alias: String,
    pub on: String,
}

impl Join {
    pub fn to_sql(&self) -> String {
        format!("LEFT JOIN {} AS {} ON {}", self.table, self.alias, self.on)
    }
}

/// Joins keyed by relationship name
///
/// A second filter over the same relationship reuses the first alias, so the
/// two constraints apply to the same joined row.
#[derive(Debug)]
pub struct JoinRegistry {
    root_alias: &'static str,
    joins: Vec<Join>,
    by_relation: HashMap<&'static str, usize>,
}

impl JoinRegistry {
    pub fn new(root_alias: &'static str) -> Self {
        Self {
            root_alias,
            joins: Vec::new(),
            by_relation: HashMap::new(),
        }
    }

    /// Alias of the join for `relation`, registering it on first use
    pub fn alias_for(&mut self, relation: &'static Relation) -> &str {
        let index = match self.by_relation.get(relation.name) {
            Some(&index) => index,
            None => {
                let alias = format!("{}_{}", relation.name, self.joins.len() + 1);
                let on = format!(
                    "{}.{} = {}.{}",
                    alias, relation.remote_column, self.root_alias, relation.local_column
                );
                self.joins.push(Join {
                    relation_name: relation.name,
                    table: relation.target.table,
                    alias,
                    on,
                });
                let index = self.joins.len() - 1;
                self.by_relation.insert(relation.name, index);
                index
            }
        };
        &self.joins[index].alias
    }

    pub fn len(&self) -> usize {
        self.joins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joins.is_empty()
    }

    pub fn into_joins(self) -> Vec<Join> {
        self.joins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static TARGET: EntityDef = EntityDef {
        name: "Target",
        table: "target",
        id_column: "id",
        columns: &["id"],
        sortable: &[("id", "id")],
    };

    static OWNER: Relation = Relation {
        name: "owner",
        target: &TARGET,
        local_column: "owner_id",
        remote_column: "id",
        cardinality: Cardinality::ManyToOne,
    };

    static CHILDREN: Relation = Relation {
        name: "children",
        target: &TARGET,
        local_column: "id",
        remote_column: "parent_id",
        cardinality: Cardinality::OneToMany,
    };

    #[test]
    fn test_registry_reuses_alias_per_relation() {
        let mut registry = JoinRegistry::new("root");
        let first = registry.alias_for(&OWNER).to_string();
        let second = registry.alias_for(&OWNER).to_string();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_separate_relations_to_same_table() {
        let mut registry = JoinRegistry::new("root");
        let owner = registry.alias_for(&OWNER).to_string();
        let children = registry.alias_for(&CHILDREN).to_string();
        assert_ne!(owner, children);

        let joins = registry.into_joins();
        assert_eq!(
            joins[0].to_sql(),
            "LEFT JOIN target AS owner_1 ON owner_1.id = root.owner_id"
        );
        assert_eq!(
            joins[1].to_sql(),
            "LEFT JOIN target AS children_2 ON children_2.parent_id = root.id"
        );
    }

    #[test]
    fn test_fans_out() {
        assert!(!OWNER.fans_out());
        assert!(CHILDREN.fans_out());
    }

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(TARGET.sort_column("id"), Some("id"));
        assert_eq!(TARGET.sort_column("secret"), None);
    }
}
