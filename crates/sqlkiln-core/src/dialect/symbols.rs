//! Names of the keywords and clauses dialects define.
//!
//! Dialects are keyed by these names; the renderer only ever refers to a
//! symbol through one of these constants. [`RENDERER_KEYWORDS`] and
//! [`RENDERER_CLAUSES`] enumerate everything the renderer can ask for, so
//! a dialect can be checked for completeness when it is built.

// Keywords
pub const ALL: &str = "all";
pub const AND: &str = "and";
pub const ANY: &str = "any";
pub const ASC: &str = "asc";
pub const AUTO_INCREMENT: &str = "auto_increment";
pub const CASCADE: &str = "cascade";
pub const DESC: &str = "desc";
pub const DISTINCT: &str = "distinct";
pub const EXISTS: &str = "exists";
pub const NO_ACTION: &str = "no_action";
pub const NOT_EXISTS: &str = "not_exists";
pub const NOT_NULL: &str = "not_null";
pub const NULL: &str = "null";
pub const OR: &str = "or";
pub const RESTRICT: &str = "restrict";
pub const SET_DEFAULT: &str = "set_default";
pub const SET_NULL: &str = "set_null";
pub const SOME: &str = "some";
pub const TEMPORARY: &str = "temporary";
pub const UNIQUE: &str = "unique";

// Clauses
pub const AS_ALIAS: &str = "as_alias";
pub const BETWEEN: &str = "between";
pub const CHARACTER_SET: &str = "character_set";
pub const COLLATE: &str = "collate";
pub const COMMENT: &str = "comment";
pub const COMPARISON: &str = "comparison";
pub const CONSTRAINT: &str = "constraint";
pub const DEFAULT: &str = "default";
pub const EXCEPT: &str = "except";
pub const EXPRESSION: &str = "expression";
pub const FOREIGN_KEY: &str = "foreign_key";
pub const FUNCTION: &str = "function";
pub const GROUP: &str = "group";
pub const GROUP_BY: &str = "group_by";
pub const HAVING: &str = "having";
pub const IN: &str = "in";
pub const INDEX: &str = "index";
pub const INTERSECT: &str = "intersect";
pub const IS_NOT_NULL: &str = "is_not_null";
pub const IS_NULL: &str = "is_null";
pub const JOIN_INNER: &str = "join_inner";
pub const JOIN_LEFT: &str = "join_left";
pub const JOIN_OUTER: &str = "join_outer";
pub const JOIN_RIGHT: &str = "join_right";
pub const JOIN_STRAIGHT: &str = "join_straight";
pub const LIKE: &str = "like";
pub const LIMIT: &str = "limit";
pub const LIMIT_OFFSET: &str = "limit_offset";
pub const NOT_BETWEEN: &str = "not_between";
pub const NOT_IN: &str = "not_in";
pub const NOT_LIKE: &str = "not_like";
pub const NOT_REGEXP: &str = "not_regexp";
pub const OFFSET: &str = "offset";
pub const ON_DELETE: &str = "on_delete";
pub const ON_UPDATE: &str = "on_update";
pub const ORDER_BY: &str = "order_by";
pub const PRIMARY_KEY: &str = "primary_key";
pub const REGEXP: &str = "regexp";
pub const RLIKE: &str = "rlike";
pub const SUB_QUERY: &str = "sub_query";
pub const UNION: &str = "union";
pub const UNION_ALL: &str = "union_all";
pub const UNIQUE_KEY: &str = "unique_key";
pub const WHERE: &str = "where";

/// Keywords the renderer may look up for any dialect.
pub const RENDERER_KEYWORDS: &[&str] = &[
    ALL, AND, ANY, ASC, CASCADE, DESC, EXISTS, NO_ACTION, NOT_EXISTS, NOT_NULL, NULL, OR,
    RESTRICT, SET_DEFAULT, SET_NULL, SOME,
];

/// Clauses the renderer may look up for any dialect.
pub const RENDERER_CLAUSES: &[&str] = &[
    AS_ALIAS,
    BETWEEN,
    COLLATE,
    COMPARISON,
    CONSTRAINT,
    DEFAULT,
    EXCEPT,
    EXPRESSION,
    FOREIGN_KEY,
    FUNCTION,
    GROUP,
    GROUP_BY,
    HAVING,
    IN,
    INTERSECT,
    IS_NOT_NULL,
    IS_NULL,
    JOIN_INNER,
    JOIN_LEFT,
    JOIN_OUTER,
    JOIN_RIGHT,
    JOIN_STRAIGHT,
    LIKE,
    LIMIT,
    LIMIT_OFFSET,
    NOT_BETWEEN,
    NOT_IN,
    NOT_LIKE,
    NOT_REGEXP,
    OFFSET,
    ON_DELETE,
    ON_UPDATE,
    ORDER_BY,
    PRIMARY_KEY,
    REGEXP,
    RLIKE,
    SUB_QUERY,
    UNION,
    UNION_ALL,
    UNIQUE_KEY,
    WHERE,
];
