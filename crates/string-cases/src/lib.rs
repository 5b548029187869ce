//! String-manipulation routines under test and their declared cases
//!
//! [`declarations`] lists every routine with its cases and tags, and
//! [`routine_table`] dispatches the same identifiers to the Rust bodies. Both
//! come out of one [`fixtures!`] listing so they cannot drift apart.

pub mod abstraction;
pub mod basic;
pub mod java;

use case_oracle::{
    CaseRegistry,
    Declaration,
    ParamKind,
    RegistryError,
    RoutineTable,
};

/// Parameter kinds with the array length fixed, so an empty list still has a type.
const fn kinds<const N: usize>(params: [ParamKind; N]) -> [ParamKind; N] {
    params
}

/// ```ignore
/// fixtures! {
///     #[case("(null) -> null pointer exception")]
///     #[case("(\"\") -> ok")]
///     #[tag(STRING)]
///     fn getLength(Str) => basic::get_length;
/// }
/// ```
macro_rules! fixtures {
    ($(
        $(#[case($case:literal)])+
        $(#[tag($($tag:ident),+)])?
        fn $name:ident($($param:ident),*) => $routine:path;
    )*) => {
        /// Every fixture routine with its declared cases, in listing order.
        pub fn declarations() -> Vec<Declaration> {
            vec![$(
                Declaration::new(stringify!($name), kinds([$(ParamKind::$param),*]))
                    $(.case($case))+
                    $($(.tag(stringify!($tag)))+)?
            ),*]
        }

        /// Dispatch table for every routine in [`declarations`].
        pub fn routine_table() -> RoutineTable {
            let mut table = RoutineTable::default();
            $(
                table.insert(
                    stringify!($name),
                    kinds([$(ParamKind::$param),*]).len(),
                    $routine,
                );
            )*
            table
        }
    };
}

fixtures! {
    #[case("(null) -> null pointer exception")]
    #[case("(\"\") -> ok")]
    #[case("(\"hello\") -> ok")]
    fn getLength(Str) => basic::get_length;

    #[case("(null) -> assertion error")]
    #[case("(\"\") -> assertion error")]
    #[case("(\"wish\") -> ok")]
    fn assertNotEmpty(Str) => basic::assert_not_empty;

    #[case("(null, \"cream\") -> null pointer exception")]
    #[case("(\"ice\", null) -> null pointer exception")]
    #[case("(\"ice\", \"cream\") -> ok")]
    fn concatenate(Str, Str) => basic::concatenate;

    #[case("(null, 0) -> null pointer exception")]
    #[case("(\"\", 0) -> index out of bounds")]
    #[case("(\"seventeen\", -1) -> index out of bounds")]
    #[case("(\"seventeen\", 9) -> index out of bounds")]
    #[case("(\"seventeen\", 0) -> ok")]
    #[case("(\"seventeen\", 8) -> ok")]
    fn getCharAt(Str, Int) => basic::get_char_at;

    #[case("(null, 0, 1) -> null pointer exception")]
    #[case("(\"hello\", -1, 2) -> index out of bounds")]
    #[case("(\"hello\", 0, 6) -> index out of bounds")]
    #[case("(\"hello\", 2, 1) -> index range exception")]
    #[case("(\"hello\", 0, 3) -> ok")]
    #[case("(\"\", 0, 0) -> ok")]
    fn getSubstring(Str, Int, Int) => basic::get_substring;

    #[case("(null, \"fly\") -> null pointer exception")]
    #[case("(\"butterfly\", null) -> null pointer exception")]
    #[case("(\"butterfly\", \"fly\") -> ok")]
    #[case("(\"butterfly\", \"a\") -> ok")]
    fn checkContains(Str, Str) => basic::check_contains;

    #[case("(null) -> null pointer exception")]
    #[case("(\"\") -> number format exception")]
    #[case("(\"123\") -> ok")]
    #[case("(\"dream\") -> number format exception")]
    #[case("(\"12.3\") -> number format exception")]
    #[case("(\" 123 \") -> number format exception")]
    fn parseToInt(Str) => basic::parse_to_int;

    #[case("(null, null) -> null pointer exception")]
    #[case("(\"tomorrow\", null) -> ok")]
    #[case("(null, \"together\") -> null pointer exception")]
    #[case("(\"tomorrow\", \"tomorrow\") -> ok")]
    #[case("(\"tomorrow\", \"together\") -> ok")]
    fn compareStrings(Str, Str) => basic::compare_strings;

    #[case("(\"snow\", \"\") -> ok")]
    #[case("(\"\", \"\") -> ok")]
    #[case("(null, \" \") -> null pointer exception")]
    #[case("(\"a b c\", \" \") -> ok")]
    #[case("(\"snow\", \"n\") -> ok")]
    fn splitString(Str, Str) => basic::split_string;

    #[case("(null) -> null pointer exception")]
    #[case("(\"HELLO\") -> ok")]
    #[case("(\"hello\") -> ok")]
    #[case("(\"\") -> ok")]
    fn toLowerCase(Str) => basic::to_lower_case;

    #[case("(null) -> null pointer exception")]
    #[case("(\"HELLO\") -> ok")]
    #[case("(\"hello\") -> ok")]
    #[case("(\"\") -> ok")]
    fn toUpperCase(Str) => basic::to_upper_case;

    #[case("(\"\", \"\", \"\") -> ok")]
    #[case("(\"sail away\", \"sail\", \"fly\") -> ok")]
    #[case("(null, \"sail\", \"fly\") -> null pointer exception")]
    #[case("(\"sail away\", null, \"fly\") -> null pointer exception")]
    #[case("(\"sail away\", \"sail\", null) -> null pointer exception")]
    fn replaceString(Str, Str, Str) => basic::replace_string;

    #[case("(null) -> null pointer exception")]
    #[case("(\"  stay  \") -> ok")]
    #[case("(\"\") -> ok")]
    #[case("(\"   \") -> ok")]
    fn trimString(Str) => basic::trim_string;

    #[case("(\"test@example.com\") -> ok")]
    #[case("(\"user.name+tag@example.co.dk\") -> ok")]
    #[case("(\"user_123@test-domain.org\") -> ok")]
    #[case("(\"invalid-email\") -> assertion error")]
    #[case("(\"hello.com\") -> assertion error")]
    #[case("(\"@example.com\") -> assertion error")]
    #[case("(\"user@\") -> assertion error")]
    #[case("(\"user@domain\") -> assertion error")]
    #[case("(\" user@example.com\") -> assertion error")]
    #[case("(\"user @example.com\") -> assertion error")]
    #[case("(\"user@example.com \") -> assertion error")]
    #[case("(\"user@domain..com\") -> assertion error")]
    #[case("(\"user@@example.com\") -> assertion error")]
    #[case("(\"\") -> assertion error")]
    #[case("(null) -> assertion error")]
    fn assertValidEmail(Str) => basic::assert_valid_email;

    #[case("() -> ok")]
    fn emptyString() => abstraction::empty_string;

    #[case("() -> ok")]
    fn singleCharString() => abstraction::single_char_string;

    #[case("() -> ok")]
    fn multiCharString() => abstraction::multi_char_string;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn concatEmptyStrings() => abstraction::concat_empty_strings;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn concatEmptyWithNonEmpty() => abstraction::concat_empty_with_non_empty;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn concatNonEmptyWithEmpty() => abstraction::concat_non_empty_with_empty;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn concatTwoNonEmptyStrings() => abstraction::concat_two_non_empty_strings;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn concatMultipleStrings() => abstraction::concat_multiple_strings;

    #[case("(3) -> ok")]
    #[case("(0) -> assertion error")]
    #[tag(STRING)]
    fn concatWithLengthParameter(Int) => abstraction::concat_with_length_parameter;

    #[case("(5) -> ok")]
    #[case("(0) -> assertion error")]
    #[tag(STRING)]
    fn assertStringLength(Int) => abstraction::assert_string_length;

    #[case("(10) -> ok")]
    #[case("(5) -> assertion error")]
    #[tag(STRING)]
    fn assertConcatLength(Int) => abstraction::assert_concat_length;

    #[case("(0) -> ok")]
    #[case("(1) -> assertion error")]
    #[tag(STRING)]
    fn assertEmptyStringLength(Int) => abstraction::assert_empty_string_length;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn checkPrefix() => abstraction::check_prefix;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn checkNonPrefix() => abstraction::check_non_prefix;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn checkSingleCharPrefix() => abstraction::check_single_char_prefix;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn checkFullStringAsPrefix() => abstraction::check_full_string_as_prefix;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn checkEmptyStringPrefix() => abstraction::check_empty_string_prefix;

    #[case("(true) -> ok")]
    #[case("(false) -> assertion error")]
    #[tag(STRING)]
    fn conditionalConcat(Bool) => abstraction::conditional_concat;

    #[case("(5) -> ok")]
    #[case("(4) -> assertion error")]
    #[tag(STRING)]
    fn conditionalLength(Int) => abstraction::conditional_length;

    #[case("(1) -> ok")]
    #[case("(0) -> assertion error")]
    #[tag(STRING, LOOP)]
    fn repeatStringLoop(Int) => abstraction::repeat_string_loop;

    #[case("(3) -> ok")]
    #[case("(0) -> assertion error")]
    #[tag(STRING, LOOP)]
    fn repeatStringLoopBounded(Int) => abstraction::repeat_string_loop_bounded;

    #[case("(5) -> ok")]
    #[case("(4) -> assertion error")]
    #[tag(STRING, LOOP)]
    fn buildStringWithLength(Int) => abstraction::build_string_with_length;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn substringFromStart() => abstraction::substring_from_start;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn substringFromMiddle() => abstraction::substring_from_middle;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn substringFullString() => abstraction::substring_full_string;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn stringEquality() => abstraction::string_equality;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn stringInequality() => abstraction::string_inequality;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn concatAndCompare() => abstraction::concat_and_compare;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn chainedConcat() => abstraction::chained_concat;

    #[case("(3) -> ok")]
    #[case("(2) -> assertion error")]
    #[tag(STRING)]
    fn prefixAndLengthCheck(Int) => abstraction::prefix_and_length_check;

    #[case("() -> ok")]
    #[tag(STRING, CALL)]
    fn stringBuilderConcat() => abstraction::string_builder_concat;

    #[case("(5) -> ok")]
    #[case("(4) -> assertion error")]
    #[tag(STRING)]
    fn repeatWithLength(Int) => abstraction::repeat_with_length;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn nullCheckPrevented() => abstraction::null_check_prevented;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn emptyStringAfterConditional() => abstraction::empty_string_after_conditional;

    #[case("() -> ok")]
    #[tag(STRING)]
    fn prefixOfEmptyString() => abstraction::prefix_of_empty_string;

    #[case("(1, 1) -> ok")]
    #[case("(2, 3) -> assertion error")]
    #[tag(STRING)]
    fn multiParameterStringLength(Int, Int) => abstraction::multi_parameter_string_length;
}

/// Registry over every fixture declaration.
pub fn registry() -> Result<CaseRegistry, RegistryError> {
    CaseRegistry::from_declarations(&declarations())
}
