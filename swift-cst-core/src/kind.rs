#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum SyntaxKind {
    L_PAREN,
    R_PAREN,
    L_BRACK,
    R_BRACK,
    L_BRACE,
    R_BRACE,
    COMMA,
    COLON,
    SEMICOLON,
    DOT,
    AT,
    ARROW,
    EQ,
    BACKSLASH,
    POUND_KEYWORD,

    IDENT,
    INTEGER_LITERAL,
    FLOAT_LITERAL,
    STRING_LITERAL,
    BINARY_OPERATOR,
    PREFIX_OPERATOR,
    POSTFIX_OPERATOR,

    AS_KW,
    ASSOCIATEDTYPE_KW,
    AWAIT_KW,
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CLASS_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    DEINIT_KW,
    DO_KW,
    ELSE_KW,
    ENUM_KW,
    EXTENSION_KW,
    FALLTHROUGH_KW,
    FALSE_KW,
    FOR_KW,
    FUNC_KW,
    GUARD_KW,
    IF_KW,
    IMPORT_KW,
    IN_KW,
    INIT_KW,
    INOUT_KW,
    IS_KW,
    LET_KW,
    NIL_KW,
    OPERATOR_KW,
    PRECEDENCEGROUP_KW,
    PROTOCOL_KW,
    REPEAT_KW,
    RETHROWS_KW,
    RETURN_KW,
    SELF_KW,
    SELF_TYPE_KW,
    STRUCT_KW,
    SUBSCRIPT_KW,
    SUPER_KW,
    SWITCH_KW,
    THROW_KW,
    THROWS_KW,
    TRUE_KW,
    TRY_KW,
    TYPEALIAS_KW,
    VAR_KW,
    WHERE_KW,
    WHILE_KW,
    WILDCARD,

    UNKNOWN,
    EOF,

    SOURCE_FILE,
    IMPORT_DECL,
    IMPORT_PATH,
    ATTRIBUTE,
    ATTRIBUTE_ARGS,
    MODIFIER,
    CLASS_DECL,
    STRUCT_DECL,
    ENUM_DECL,
    ACTOR_DECL,
    PROTOCOL_DECL,
    EXTENSION_DECL,
    FUNC_DECL,
    INIT_DECL,
    DEINIT_DECL,
    VARIABLE_DECL,
    OTHER_DECL,
    GENERIC_CLAUSE,
    INHERITANCE_CLAUSE,
    INHERITED_TYPE,
    WHERE_CLAUSE,
    MEMBER_BLOCK,
    FUNC_SIGNATURE,
    PARAM_CLAUSE,
    EFFECT_SPECIFIERS,
    RETURN_CLAUSE,
    TYPE,
    PATTERN_BINDING,
    PATTERN,
    TYPE_ANNOTATION,
    INITIALIZER_CLAUSE,
    ACCESSOR_BLOCK,
    ACCESSOR_DECL,
    CODE_BLOCK,
    CONTROL_STMT,
    COMPILER_DIRECTIVE,

    NAME_EXPR,
    LITERAL_EXPR,
    MACRO_EXPR,
    OPERATOR_REF_EXPR,
    MEMBER_EXPR,
    CALL_EXPR,
    ARG_LIST,
    ARGUMENT,
    SUBSCRIPT_EXPR,
    SPECIALIZE_EXPR,
    GENERIC_ARGS,
    BINARY_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    TRY_EXPR,
    AWAIT_EXPR,
    TUPLE_EXPR,
    COLLECTION_EXPR,
    CLOSURE_EXPR,
    CLOSURE_SIGNATURE,
    KEY_PATH_EXPR,
    OTHER,
    ERROR,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Reserved words of the language. Contextual keywords (`async`,
    /// `final`, `override`, `actor`, ...) are lexed as identifiers.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        let kind = match text {
            "as" => AS_KW,
            "associatedtype" => ASSOCIATEDTYPE_KW,
            "await" => AWAIT_KW,
            "break" => BREAK_KW,
            "case" => CASE_KW,
            "catch" => CATCH_KW,
            "class" => CLASS_KW,
            "continue" => CONTINUE_KW,
            "default" => DEFAULT_KW,
            "defer" => DEFER_KW,
            "deinit" => DEINIT_KW,
            "do" => DO_KW,
            "else" => ELSE_KW,
            "enum" => ENUM_KW,
            "extension" => EXTENSION_KW,
            "fallthrough" => FALLTHROUGH_KW,
            "false" => FALSE_KW,
            "for" => FOR_KW,
            "func" => FUNC_KW,
            "guard" => GUARD_KW,
            "if" => IF_KW,
            "import" => IMPORT_KW,
            "in" => IN_KW,
            "init" => INIT_KW,
            "inout" => INOUT_KW,
            "is" => IS_KW,
            "let" => LET_KW,
            "nil" => NIL_KW,
            "operator" => OPERATOR_KW,
            "precedencegroup" => PRECEDENCEGROUP_KW,
            "protocol" => PROTOCOL_KW,
            "repeat" => REPEAT_KW,
            "rethrows" => RETHROWS_KW,
            "return" => RETURN_KW,
            "self" => SELF_KW,
            "Self" => SELF_TYPE_KW,
            "struct" => STRUCT_KW,
            "subscript" => SUBSCRIPT_KW,
            "super" => SUPER_KW,
            "switch" => SWITCH_KW,
            "throw" => THROW_KW,
            "throws" => THROWS_KW,
            "true" => TRUE_KW,
            "try" => TRY_KW,
            "typealias" => TYPEALIAS_KW,
            "var" => VAR_KW,
            "where" => WHERE_KW,
            "while" => WHILE_KW,
            "_" => WILDCARD,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(self) -> bool {
        (AS_KW..=WILDCARD).contains(&self)
    }

    /// Leaf kinds produced by the lexer.
    pub fn is_token(self) -> bool {
        self <= EOF
    }

    pub fn is_operator(self) -> bool {
        matches!(self, BINARY_OPERATOR | PREFIX_OPERATOR | POSTFIX_OPERATOR)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            INTEGER_LITERAL | FLOAT_LITERAL | STRING_LITERAL | TRUE_KW | FALSE_KW | NIL_KW
        )
    }

    /// Nominal type declarations that own a member block.
    pub fn is_type_decl(self) -> bool {
        matches!(
            self,
            CLASS_DECL | STRUCT_DECL | ENUM_DECL | ACTOR_DECL | PROTOCOL_DECL | EXTENSION_DECL
        )
    }

    pub fn is_decl(self) -> bool {
        self.is_type_decl()
            || matches!(
                self,
                IMPORT_DECL
                    | FUNC_DECL
                    | INIT_DECL
                    | DEINIT_DECL
                    | VARIABLE_DECL
                    | OTHER_DECL
            )
    }

    pub fn is_expr(self) -> bool {
        matches!(
            self,
            NAME_EXPR
                | LITERAL_EXPR
                | MACRO_EXPR
                | OPERATOR_REF_EXPR
                | MEMBER_EXPR
                | CALL_EXPR
                | SUBSCRIPT_EXPR
                | SPECIALIZE_EXPR
                | BINARY_EXPR
                | PREFIX_EXPR
                | POSTFIX_EXPR
                | TRY_EXPR
                | AWAIT_EXPR
                | TUPLE_EXPR
                | COLLECTION_EXPR
                | CLOSURE_EXPR
                | KEY_PATH_EXPR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip_through_lookup() {
        assert_eq!(SyntaxKind::from_keyword("func"), Some(FUNC_KW));
        assert_eq!(SyntaxKind::from_keyword("Self"), Some(SELF_TYPE_KW));
        assert_eq!(SyntaxKind::from_keyword("async"), None);
        assert!(FUNC_KW.is_keyword());
        assert!(WILDCARD.is_keyword());
        assert!(!IDENT.is_keyword());
    }

    #[test]
    fn token_and_node_kinds_are_disjoint() {
        assert!(EOF.is_token());
        assert!(L_PAREN.is_token());
        assert!(!SOURCE_FILE.is_token());
        assert!(CALL_EXPR.is_expr());
        assert!(EXTENSION_DECL.is_type_decl());
    }
}
