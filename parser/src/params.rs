//! [`Parameters`] registry and [`BracketPair`]s.

use hashbrown::HashMap;

use core::fmt;

use crate::{
    alloc::{Cow, String, ToOwned, Vec},
    is_valid_name, Constant, DefinitionError, Function, Grammar, OpArity, Operator,
};

/// Matched pair of open / close symbols.
///
/// A pair can be used to group subexpressions (`(1 + 2) * 3`) or to delimit function
/// arguments (`max(1, 2)`), or both; see [`Parameters::add_expression_bracket()`] and
/// [`Parameters::add_function_bracket()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BracketPair {
    open: Cow<'static, str>,
    close: Cow<'static, str>,
}

impl BracketPair {
    /// Parentheses: `(` and `)`.
    pub const PARENTHESES: Self = Self::new_static("(", ")");
    /// Square brackets: `[` and `]`.
    pub const SQUARE_BRACKETS: Self = Self::new_static("[", "]");
    /// Braces: `{` and `}`.
    pub const BRACES: Self = Self::new_static("{", "}");
    /// Angle brackets: `<` and `>`.
    pub const ANGLE_BRACKETS: Self = Self::new_static("<", ">");

    const fn new_static(open: &'static str, close: &'static str) -> Self {
        Self {
            open: Cow::Borrowed(open),
            close: Cow::Borrowed(close),
        }
    }

    /// Creates a pair with custom symbols.
    pub fn new(open: impl Into<Cow<'static, str>>, close: impl Into<Cow<'static, str>>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Returns the open symbol.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// Returns the close symbol.
    pub fn close(&self) -> &str {
        &self.close
    }
}

impl fmt::Display for BracketPair {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}{}", self.open, self.close)
    }
}

/// Class of a registered symbol, as seen by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolClass {
    /// Operator symbol (unary, binary or both).
    Operator,
    /// Open bracket symbol.
    OpenBracket,
    /// Close bracket symbol.
    CloseBracket,
    /// Function argument separator.
    Separator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamedElement {
    Function(usize),
    Constant(usize),
}

/// Operator indices for a single symbol.
#[derive(Debug, Clone, Copy, Default)]
struct OperatorSlots {
    unary: Option<usize>,
    binary: Option<usize>,
}

impl OperatorSlots {
    fn get(self, arity: OpArity) -> Option<usize> {
        match arity {
            OpArity::Unary => self.unary,
            OpArity::Binary => self.binary,
        }
    }

    fn get_mut(&mut self, arity: OpArity) -> &mut Option<usize> {
        match arity {
            OpArity::Unary => &mut self.unary,
            OpArity::Binary => &mut self.binary,
        }
    }
}

/// Registry of grammar elements accepted by an evaluator: operators, functions, constants,
/// bracket pairs and the function argument separator.
///
/// Parameters are assembled once and are then only read; tokenizing and evaluating
/// expressions takes parameters by shared reference. Each registration fails with
/// a [`DefinitionError`] if it would make the grammar ambiguous.
///
/// # Examples
///
/// ```
/// use shunt_parser::{
///     Associativity, BracketPair, FnArity, Function, OpArity, Operator, Parameters, Symbolic,
/// };
///
/// # fn main() -> anyhow::Result<()> {
/// let mut params = Parameters::<Symbolic>::new();
/// params
///     .add_operators([
///         Operator::binary("<", Associativity::Left, 4, ()),
///         Operator::binary("<=", Associativity::Left, 4, ()),
///         Operator::unary("-", 7, ()),
///         Operator::binary("-", Associativity::Left, 5, ()),
///     ])?
///     .add_function(Function::new("max", FnArity::at_least(1), ()))?
///     .add_expression_bracket(BracketPair::PARENTHESES)?
///     .add_function_bracket(BracketPair::PARENTHESES)?;
///
/// // Operators are looked up by symbol *and* arity.
/// assert_eq!(params.operator("-", OpArity::Unary).unwrap().precedence(), 7);
/// assert_eq!(params.operator("-", OpArity::Binary).unwrap().precedence(), 5);
/// // The longest registered symbol wins.
/// assert_eq!(params.symbol_at("<= 3").unwrap().0, "<=");
///
/// // Ambiguous definitions are rejected.
/// let err = params.add_operator(Operator::unary("-", 9, ())).unwrap_err();
/// assert_eq!(err.to_string(), "Operator `-` (unary) is already defined");
/// # Ok(())
/// # }
/// ```
pub struct Parameters<G: Grammar> {
    operators: Vec<Operator<G::Op>>,
    operator_slots: HashMap<String, OperatorSlots>,
    functions: Vec<Function<G::Func>>,
    constants: Vec<Constant<G::Const>>,
    names: HashMap<String, NamedElement>,
    expression_brackets: Vec<BracketPair>,
    function_brackets: Vec<BracketPair>,
    separator: String,
    symbols: HashMap<String, SymbolClass>,
    /// Distinct byte lengths of `symbols`, in descending order.
    symbol_lengths: Vec<usize>,
}

impl<G: Grammar> fmt::Debug for Parameters<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Parameters")
            .field("operators", &self.operators)
            .field("functions", &self.functions)
            .field("constants", &self.constants)
            .field("expression_brackets", &self.expression_brackets)
            .field("function_brackets", &self.function_brackets)
            .field("separator", &self.separator)
            .finish()
    }
}

impl<G: Grammar> Clone for Parameters<G> {
    fn clone(&self) -> Self {
        Self {
            operators: self.operators.clone(),
            operator_slots: self.operator_slots.clone(),
            functions: self.functions.clone(),
            constants: self.constants.clone(),
            names: self.names.clone(),
            expression_brackets: self.expression_brackets.clone(),
            function_brackets: self.function_brackets.clone(),
            separator: self.separator.clone(),
            symbols: self.symbols.clone(),
            symbol_lengths: self.symbol_lengths.clone(),
        }
    }
}

impl<G: Grammar> Default for Parameters<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grammar> Parameters<G> {
    /// Default function argument separator.
    pub const DEFAULT_SEPARATOR: &'static str = ",";

    /// Creates empty parameters with the default argument separator `,`.
    pub fn new() -> Self {
        let mut this = Self {
            operators: Vec::new(),
            operator_slots: HashMap::new(),
            functions: Vec::new(),
            constants: Vec::new(),
            names: HashMap::new(),
            expression_brackets: Vec::new(),
            function_brackets: Vec::new(),
            separator: Self::DEFAULT_SEPARATOR.to_owned(),
            symbols: HashMap::new(),
            symbol_lengths: Vec::new(),
        };
        this.insert_symbol(Self::DEFAULT_SEPARATOR, SymbolClass::Separator);
        this
    }

    fn check_symbol(&self, symbol: &str, class: SymbolClass) -> Result<(), DefinitionError> {
        if symbol.is_empty() {
            return Err(DefinitionError::EmptySymbol);
        }
        match self.symbols.get(symbol) {
            Some(&existing) if existing != class => Err(DefinitionError::SymbolConflict {
                symbol: symbol.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    fn insert_symbol(&mut self, symbol: &str, class: SymbolClass) {
        self.symbols.insert(symbol.to_owned(), class);
        self.update_symbol_lengths();
    }

    fn update_symbol_lengths(&mut self) {
        let mut lengths: Vec<_> = self.symbols.keys().map(String::len).collect();
        lengths.sort_unstable_by(|x, y| y.cmp(x));
        lengths.dedup();
        self.symbol_lengths = lengths;
    }

    /// Registers an operator.
    pub fn add_operator(&mut self, operator: Operator<G::Op>) -> Result<&mut Self, DefinitionError> {
        let symbol = operator.symbol();
        self.check_symbol(symbol, SymbolClass::Operator)?;
        let arity = operator.arity();
        let slots = self.operator_slots.get(symbol).copied().unwrap_or_default();
        if slots.get(arity).is_some() {
            return Err(DefinitionError::DuplicateOperator {
                symbol: symbol.to_owned(),
                arity,
            });
        }

        log::debug!("Registering {}", operator);
        let symbol = symbol.to_owned();
        let index = self.operators.len();
        self.operators.push(operator);
        *self
            .operator_slots
            .entry(symbol.clone())
            .or_default()
            .get_mut(arity) = Some(index);
        self.insert_symbol(&symbol, SymbolClass::Operator);
        Ok(self)
    }

    /// Registers multiple operators. Registration stops on the first error.
    pub fn add_operators<I>(&mut self, operators: I) -> Result<&mut Self, DefinitionError>
    where
        I: IntoIterator<Item = Operator<G::Op>>,
    {
        for operator in operators {
            self.add_operator(operator)?;
        }
        Ok(self)
    }

    fn check_name(&self, name: &str) -> Result<(), DefinitionError> {
        if is_valid_name(name) {
            Ok(())
        } else {
            Err(DefinitionError::InvalidName {
                name: name.to_owned(),
            })
        }
    }

    /// Registers a function. Functions and constants share a single namespace.
    pub fn add_function(&mut self, function: Function<G::Func>) -> Result<&mut Self, DefinitionError> {
        let name = function.name();
        self.check_name(name)?;
        if self.names.contains_key(name) {
            return Err(DefinitionError::DuplicateFunction {
                name: name.to_owned(),
            });
        }

        log::debug!("Registering function `{}` with arity {}", name, function.arity());
        let element = NamedElement::Function(self.functions.len());
        self.names.insert(name.to_owned(), element);
        self.functions.push(function);
        Ok(self)
    }

    /// Registers multiple functions. Registration stops on the first error.
    pub fn add_functions<I>(&mut self, functions: I) -> Result<&mut Self, DefinitionError>
    where
        I: IntoIterator<Item = Function<G::Func>>,
    {
        for function in functions {
            self.add_function(function)?;
        }
        Ok(self)
    }

    /// Registers a constant. Functions and constants share a single namespace.
    pub fn add_constant(&mut self, constant: Constant<G::Const>) -> Result<&mut Self, DefinitionError> {
        let name = constant.name();
        self.check_name(name)?;
        if self.names.contains_key(name) {
            return Err(DefinitionError::DuplicateConstant {
                name: name.to_owned(),
            });
        }

        log::debug!("Registering constant `{}`", name);
        let element = NamedElement::Constant(self.constants.len());
        self.names.insert(name.to_owned(), element);
        self.constants.push(constant);
        Ok(self)
    }

    /// Registers multiple constants. Registration stops on the first error.
    pub fn add_constants<I>(&mut self, constants: I) -> Result<&mut Self, DefinitionError>
    where
        I: IntoIterator<Item = Constant<G::Const>>,
    {
        for constant in constants {
            self.add_constant(constant)?;
        }
        Ok(self)
    }

    fn add_bracket(&mut self, pair: BracketPair, for_functions: bool) -> Result<&mut Self, DefinitionError> {
        self.check_symbol(pair.open(), SymbolClass::OpenBracket)?;
        self.check_symbol(pair.close(), SymbolClass::CloseBracket)?;
        if pair.open() == pair.close() {
            return Err(DefinitionError::SymbolConflict {
                symbol: pair.open().to_owned(),
            });
        }

        let (same_role, other_role) = if for_functions {
            (&self.function_brackets, &self.expression_brackets)
        } else {
            (&self.expression_brackets, &self.function_brackets)
        };
        let is_duplicate = same_role.iter().any(|existing| existing.open() == pair.open())
            || other_role
                .iter()
                .any(|existing| existing.open() == pair.open() && existing.close() != pair.close());
        if is_duplicate {
            return Err(DefinitionError::DuplicateBracket {
                symbol: pair.open().to_owned(),
            });
        }

        log::debug!(
            "Registering {} bracket pair {}",
            if for_functions { "function" } else { "expression" },
            pair
        );
        self.insert_symbol(pair.open(), SymbolClass::OpenBracket);
        self.insert_symbol(pair.close(), SymbolClass::CloseBracket);
        if for_functions {
            self.function_brackets.push(pair);
        } else {
            self.expression_brackets.push(pair);
        }
        Ok(self)
    }

    /// Registers a bracket pair delimiting function arguments, e.g., `(` / `)` in `max(1, 2)`.
    pub fn add_function_bracket(&mut self, pair: BracketPair) -> Result<&mut Self, DefinitionError> {
        self.add_bracket(pair, true)
    }

    /// Registers multiple function bracket pairs.
    pub fn add_function_brackets<I>(&mut self, pairs: I) -> Result<&mut Self, DefinitionError>
    where
        I: IntoIterator<Item = BracketPair>,
    {
        for pair in pairs {
            self.add_function_bracket(pair)?;
        }
        Ok(self)
    }

    /// Registers a bracket pair grouping subexpressions, e.g., `(` / `)` in `(1 + 2) * 3`.
    pub fn add_expression_bracket(&mut self, pair: BracketPair) -> Result<&mut Self, DefinitionError> {
        self.add_bracket(pair, false)
    }

    /// Registers multiple expression bracket pairs.
    pub fn add_expression_brackets<I>(&mut self, pairs: I) -> Result<&mut Self, DefinitionError>
    where
        I: IntoIterator<Item = BracketPair>,
    {
        for pair in pairs {
            self.add_expression_bracket(pair)?;
        }
        Ok(self)
    }

    /// Replaces the function argument separator (`,` by default), e.g., with `;` for locales
    /// using `,` as the decimal mark.
    pub fn set_function_argument_separator(
        &mut self,
        separator: impl Into<String>,
    ) -> Result<&mut Self, DefinitionError> {
        let separator = separator.into();
        self.check_symbol(&separator, SymbolClass::Separator)?;

        log::debug!("Using `{}` as function argument separator", separator);
        self.symbols.remove(self.separator.as_str());
        self.insert_symbol(&separator, SymbolClass::Separator);
        self.separator = separator;
        Ok(self)
    }

    /// Exposes a registered function or constant under a localized name. The element is
    /// no longer accessible under its canonical `name`; hosts still receive the element
    /// with its canonical name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use shunt_parser::{FnArity, Function, Parameters, Symbolic};
    /// # fn main() -> anyhow::Result<()> {
    /// let mut params = Parameters::<Symbolic>::new();
    /// params
    ///     .add_function(Function::new("sum", FnArity::at_least(1), ()))?
    ///     .set_translation("sum", "somme")?;
    /// assert_eq!(params.function("somme").unwrap().name(), "sum");
    /// assert!(params.function("sum").is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_translation(
        &mut self,
        name: &str,
        localized: impl Into<String>,
    ) -> Result<&mut Self, DefinitionError> {
        let localized = localized.into();
        self.check_name(&localized)?;

        let element = self
            .names
            .iter()
            .find_map(|(_, &element)| (self.element_name(element) == name).then_some(element))
            .ok_or_else(|| DefinitionError::UnknownName {
                name: name.to_owned(),
            })?;
        if self.names.get(localized.as_str()).map_or(false, |&other| other != element) {
            return Err(match element {
                NamedElement::Function(_) => DefinitionError::DuplicateFunction { name: localized },
                NamedElement::Constant(_) => DefinitionError::DuplicateConstant { name: localized },
            });
        }

        log::debug!("Translating `{}` as `{}`", name, localized);
        self.names.retain(|_, &mut other| other != element);
        self.names.insert(localized, element);
        Ok(self)
    }

    fn element_name(&self, element: NamedElement) -> &str {
        match element {
            NamedElement::Function(idx) => self.functions[idx].name(),
            NamedElement::Constant(idx) => self.constants[idx].name(),
        }
    }

    /// Looks up an operator by its symbol and arity.
    pub fn operator(&self, symbol: &str, arity: OpArity) -> Option<&Operator<G::Op>> {
        let index = self.operator_slots.get(symbol)?.get(arity)?;
        Some(&self.operators[index])
    }

    /// Returns all operators with the specified symbol (at most one unary and one binary).
    pub fn operators_with_symbol<'s>(
        &'s self,
        symbol: &str,
    ) -> impl Iterator<Item = &'s Operator<G::Op>> + 's {
        let slots = self.operator_slots.get(symbol).copied().unwrap_or_default();
        [slots.unary, slots.binary]
            .into_iter()
            .flatten()
            .map(move |idx| &self.operators[idx])
    }

    /// Looks up a function by its (possibly translated) name.
    pub fn function(&self, name: &str) -> Option<&Function<G::Func>> {
        match self.names.get(name)? {
            NamedElement::Function(idx) => Some(&self.functions[*idx]),
            NamedElement::Constant(_) => None,
        }
    }

    /// Looks up a constant by its (possibly translated) name.
    pub fn constant(&self, name: &str) -> Option<&Constant<G::Const>> {
        match self.names.get(name)? {
            NamedElement::Constant(idx) => Some(&self.constants[*idx]),
            NamedElement::Function(_) => None,
        }
    }

    /// Looks up a bracket pair grouping subexpressions by its open symbol.
    pub fn expression_bracket(&self, open: &str) -> Option<&BracketPair> {
        self.expression_brackets.iter().find(|pair| pair.open() == open)
    }

    /// Looks up a bracket pair delimiting function args by its open symbol.
    pub fn function_bracket(&self, open: &str) -> Option<&BracketPair> {
        self.function_brackets.iter().find(|pair| pair.open() == open)
    }

    /// Iterates over bracket pairs with the specified close symbol.
    pub fn closing_brackets<'s>(&'s self, close: &'s str) -> impl Iterator<Item = &'s BracketPair> + 's {
        self.bracket_pairs().filter(move |pair| pair.close() == close)
    }

    /// Iterates over all registered bracket pairs. A pair registered both for grouping
    /// and for function args is returned once.
    pub fn bracket_pairs(&self) -> impl Iterator<Item = &BracketPair> + '_ {
        let function_only = self
            .function_brackets
            .iter()
            .filter(move |pair| !self.expression_brackets.contains(pair));
        self.expression_brackets.iter().chain(function_only)
    }

    /// Iterates over bracket pairs grouping subexpressions.
    pub fn expression_brackets(&self) -> impl Iterator<Item = &BracketPair> + '_ {
        self.expression_brackets.iter()
    }

    /// Iterates over bracket pairs delimiting function args.
    pub fn function_brackets(&self) -> impl Iterator<Item = &BracketPair> + '_ {
        self.function_brackets.iter()
    }

    /// Iterates over registered operators in the registration order.
    pub fn operators(&self) -> impl Iterator<Item = &Operator<G::Op>> + '_ {
        self.operators.iter()
    }

    /// Iterates over registered functions in the registration order.
    pub fn functions(&self) -> impl Iterator<Item = &Function<G::Func>> + '_ {
        self.functions.iter()
    }

    /// Iterates over registered constants in the registration order.
    pub fn constants(&self) -> impl Iterator<Item = &Constant<G::Const>> + '_ {
        self.constants.iter()
    }

    /// Returns the function argument separator.
    pub fn argument_separator(&self) -> &str {
        &self.separator
    }

    /// Iterates over all registered symbols (operators, brackets and the separator),
    /// longest symbols first.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, SymbolClass)> + '_ {
        let mut symbols: Vec<_> = self
            .symbols
            .iter()
            .map(|(symbol, &class)| (symbol.as_str(), class))
            .collect();
        symbols.sort_unstable_by(|(x, _), (y, _)| y.len().cmp(&x.len()).then_with(|| x.cmp(y)));
        symbols.into_iter()
    }

    /// Finds the longest registered symbol that `text` starts with.
    ///
    /// Symbols ending with an identifier char (e.g., `and`) only match if they are not
    /// immediately followed by another identifier char, so that `android` is not split
    /// into `and` + `roid`.
    pub fn symbol_at<'t>(&self, text: &'t str) -> Option<(&'t str, SymbolClass)> {
        self.symbol_lengths.iter().find_map(|&len| {
            let candidate = text.get(..len)?;
            let class = *self.symbols.get(candidate)?;
            let ends_with_ident = candidate.chars().next_back().map_or(false, is_ident_char);
            let continues_ident = text[len..].chars().next().map_or(false, is_ident_char);
            if ends_with_ident && continues_ident {
                None
            } else {
                Some((candidate, class))
            }
        })
    }
}

pub(crate) fn is_ident_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}
