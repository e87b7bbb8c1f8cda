//! The interactive shell over a session.
//!
//! The REPL is a thin front end: every command maps onto one session
//! operation, with concept and type names resolved to identifiers on the way
//! in. It adds no kernel semantics of its own.

use std::fmt::Write as _;

use credence_engine::{ConceptCriteria, InferenceQuery, Provenance};
use credence_foundation::{ConceptId, Error, Fraction, PrincipalId, Result, TypeId};
use credence_store::{LogicalProperties, TypeDefinition, TypeStatus};

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::serialize;
use crate::session::Session;

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// Session state (store, clock).
    session: Session,

    /// The principal stamped onto mutations, switchable with `login`.
    caller: PrincipalId,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Primary prompt.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a new REPL with the default rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a new REPL with the given editor.
    pub fn with_editor(editor: E) -> Self {
        Self {
            editor,
            session: Session::new(),
            caller: PrincipalId::new("local"),
            show_banner: true,
            prompt: "?> ".to_string(),
        }
    }

    /// Sets the session for this REPL.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Returns a reference to the session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let input = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => return Ok(false),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(true);
        }
        self.editor.add_history(trimmed);

        if trimmed == "quit" || trimmed == "exit" {
            return Ok(false);
        }

        match self.eval(trimmed) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}");
                }
            }
            Err(e) => print_error(&e),
        }
        Ok(true)
    }

    /// Evaluates one command line, returning the text to print.
    ///
    /// # Errors
    ///
    /// Returns the underlying session error for failed operations, or an
    /// invalid-operation error for malformed command syntax.
    pub fn eval(&mut self, line: &str) -> Result<String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (&command, args) = words
            .split_first()
            .ok_or_else(|| Error::invalid_operation("empty command"))?;

        match command {
            "help" => Ok(help_text().to_string()),
            "whoami" => Ok(self.caller.to_string()),
            "login" => self.cmd_login(args),
            "concept" => self.cmd_concept(args),
            "concepts" => Ok(self.cmd_concepts()),
            "type" => self.cmd_type(args),
            "types" => Ok(self.cmd_types()),
            "deprecate" => self.cmd_deprecate(args),
            "assert" => self.cmd_assert(args),
            "relationships" => Ok(self.cmd_relationships()),
            "find" => self.cmd_find(args),
            "infer" => self.cmd_infer(args),
            "save" => self.cmd_save(args),
            "load" => self.cmd_load(args),
            other => Err(Error::invalid_operation(format!(
                "unknown command {other}; try help"
            ))),
        }
    }

    fn cmd_login(&mut self, args: &[&str]) -> Result<String> {
        let [principal] = args else {
            return Err(usage("login <principal>"));
        };
        self.caller = PrincipalId::new(*principal);
        Ok(format!("now acting as {}", self.caller))
    }

    fn cmd_concept(&mut self, args: &[&str]) -> Result<String> {
        let Some((&name, rest)) = args.split_first() else {
            return Err(usage("concept <name> [description...]"));
        };
        let description = (!rest.is_empty()).then(|| rest.join(" "));
        let id = self
            .session
            .create_concept(&self.caller, name, description, None)?;
        Ok(format!("created {id} ({name})"))
    }

    fn cmd_concepts(&self) -> String {
        let mut out = String::new();
        for concept in self.session.store().concepts() {
            let _ = writeln!(
                out,
                "{}  {}  (by {})",
                concept.id, concept.name, concept.creator.principal
            );
        }
        if out.is_empty() {
            out.push_str("no concepts");
        }
        out.trim_end().to_string()
    }

    fn cmd_type(&mut self, args: &[&str]) -> Result<String> {
        let Some((&name, flags)) = args.split_first() else {
            return Err(usage(
                "type <name> [transitive] [symmetric] [reflexive] [irreflexive]",
            ));
        };
        let mut properties = LogicalProperties::new();
        for &flag in flags {
            properties = match flag {
                "transitive" => properties.transitive(),
                "symmetric" => properties.symmetric(),
                "reflexive" => properties.reflexive(),
                "irreflexive" => properties.irreflexive(),
                other => {
                    return Err(Error::invalid_operation(format!(
                        "unknown property {other}"
                    )));
                }
            };
        }
        let definition = TypeDefinition::new(name).with_properties(properties);
        let id = self
            .session
            .create_relationship_type(&self.caller, definition)?;
        Ok(format!("created {id} ({name})"))
    }

    fn cmd_types(&self) -> String {
        let mut out = String::new();
        for ty in self.session.store().relationship_types() {
            let mut laws = Vec::new();
            if ty.properties.transitive {
                laws.push("transitive");
            }
            if ty.properties.symmetric {
                laws.push("symmetric");
            }
            if ty.properties.reflexive {
                laws.push("reflexive");
            }
            if ty.properties.irreflexive {
                laws.push("irreflexive");
            }
            let status = match &ty.status {
                TypeStatus::Active => "active".to_string(),
                TypeStatus::Deprecated { reason, .. } => format!("deprecated: {reason}"),
            };
            let _ = writeln!(out, "{}  {}  [{}]  {}", ty.id, ty.name, laws.join(" "), status);
        }
        out.trim_end().to_string()
    }

    fn cmd_deprecate(&mut self, args: &[&str]) -> Result<String> {
        let Some((&name, rest)) = args.split_first() else {
            return Err(usage("deprecate <type> [reason...]"));
        };
        let id = self.resolve_type(name)?;
        let reason = if rest.is_empty() {
            "deprecated from the shell".to_string()
        } else {
            rest.join(" ")
        };
        self.session.deprecate_relationship_type(id, None, reason)?;
        Ok(format!("deprecated {id}"))
    }

    fn cmd_assert(&mut self, args: &[&str]) -> Result<String> {
        let [from, ty, to, probability, confidence] = args else {
            return Err(usage("assert <from> <type> <to> <prob n/d> <conf n/d>"));
        };
        let from = self.resolve_concept(from)?;
        let to = self.resolve_concept(to)?;
        let type_id = self.resolve_type(ty)?;
        let probability = parse_fraction(probability)?;
        let confidence = parse_fraction(confidence)?;

        let id = self.session.assert_relationship(
            &self.caller,
            from,
            to,
            type_id,
            probability,
            confidence,
            None,
        )?;
        Ok(format!("asserted {id}"))
    }

    fn cmd_relationships(&self) -> String {
        let mut out = String::new();
        for edge in self.session.store().relationships() {
            let _ = writeln!(
                out,
                "{}  {} -[{}]-> {}  p={} c={}",
                edge.id,
                self.concept_name(edge.from),
                self.type_name(edge.type_id),
                self.concept_name(edge.to),
                edge.probability,
                edge.confidence
            );
        }
        if out.is_empty() {
            out.push_str("no relationships");
        }
        out.trim_end().to_string()
    }

    fn cmd_find(&mut self, args: &[&str]) -> Result<String> {
        let [needle] = args else {
            return Err(usage("find <substring>"));
        };
        let page = self
            .session
            .query_concepts(&ConceptCriteria::new().with_name_contains(*needle));
        let mut out = String::new();
        for concept in &page.items {
            let _ = writeln!(out, "{}  {}", concept.id, concept.name);
        }
        let _ = write!(out, "{} match(es)", page.total);
        Ok(out)
    }

    fn cmd_infer(&mut self, args: &[&str]) -> Result<String> {
        let Some((&start, mut rest)) = args.split_first() else {
            return Err(usage(
                "infer <start> [<type>] [depth <n>] [min-p <n/d>] [min-c <n/d>]",
            ));
        };
        let mut query = InferenceQuery::new(self.resolve_concept(start)?);

        if let Some((&ty, tail)) = rest.split_first() {
            if !matches!(ty, "depth" | "min-p" | "min-c") {
                query = query.with_type(self.resolve_type(ty)?);
                rest = tail;
            }
        }
        while let Some((&key, tail)) = rest.split_first() {
            let Some((&value, tail)) = tail.split_first() else {
                return Err(usage("infer options come in key/value pairs"));
            };
            query = match key {
                "depth" => {
                    let depth = value.parse().map_err(|_| {
                        Error::invalid_operation(format!("invalid depth {value}"))
                    })?;
                    query.with_max_depth(depth)
                }
                "min-p" => {
                    let (n, d) = parse_fraction(value)?;
                    query.with_min_probability(Fraction::new(n, d)?)
                }
                "min-c" => {
                    let (n, d) = parse_fraction(value)?;
                    query.with_min_confidence(Fraction::new(n, d)?)
                }
                other => {
                    return Err(Error::invalid_operation(format!(
                        "unknown infer option {other}"
                    )));
                }
            };
            rest = tail;
        }

        let results = self.session.infer_relationships(&query)?;
        let mut out = String::new();
        for inferred in &results {
            let provenance = match &inferred.provenance {
                Provenance::Direct(id) => format!("direct {id}"),
                Provenance::Symmetric(id) => format!("mirror of {id}"),
                Provenance::Transitive { first, second, .. } => {
                    format!("chain {first}..{second}")
                }
            };
            let _ = writeln!(
                out,
                "{} -[{}]-> {}  p={} c={}  ({provenance})",
                self.concept_name(inferred.from),
                self.type_name(inferred.type_id),
                self.concept_name(inferred.to),
                inferred.probability,
                inferred.confidence
            );
        }
        let _ = write!(out, "{} derivation(s)", results.len());
        Ok(out)
    }

    fn cmd_save(&mut self, args: &[&str]) -> Result<String> {
        let [path] = args else {
            return Err(usage("save <path>"));
        };
        serialize::save_to_file(self.session.store(), path)?;
        Ok(format!("saved to {path}"))
    }

    fn cmd_load(&mut self, args: &[&str]) -> Result<String> {
        let [path] = args else {
            return Err(usage("load <path>"));
        };
        let store = serialize::load_from_file(path)?;
        self.session.replace_store(store);
        Ok(format!("loaded from {path}"))
    }

    /// Resolves `#id` or an exact concept name.
    fn resolve_concept(&self, text: &str) -> Result<ConceptId> {
        if let Some(raw) = text.strip_prefix('#') {
            let id = raw
                .parse()
                .map_err(|_| Error::invalid_operation(format!("invalid identifier {text}")))?;
            return Ok(ConceptId::new(id));
        }
        self.session
            .store()
            .concepts()
            .find(|concept| concept.name == text)
            .map(|concept| concept.id)
            .ok_or_else(|| Error::not_found(format!("no concept named {text}")))
    }

    /// Resolves `#id` or an active type name.
    fn resolve_type(&self, text: &str) -> Result<TypeId> {
        if let Some(raw) = text.strip_prefix('#') {
            let id = raw
                .parse()
                .map_err(|_| Error::invalid_operation(format!("invalid identifier {text}")))?;
            return Ok(TypeId::new(id));
        }
        self.session
            .store()
            .find_active_type_by_name(text)
            .map(|ty| ty.id)
            .ok_or_else(|| Error::not_found(format!("no active type named {text}")))
    }

    fn concept_name(&self, id: ConceptId) -> String {
        self.session
            .store()
            .concept(id)
            .map_or_else(|| id.to_string(), |concept| concept.name.clone())
    }

    fn type_name(&self, id: TypeId) -> String {
        self.session
            .store()
            .relationship_type(id)
            .map_or_else(|| id.to_string(), |ty| ty.name.clone())
    }
}

/// Parses a fraction written as `n/d`.
fn parse_fraction(text: &str) -> Result<(u64, u64)> {
    let parse = |part: &str| {
        part.parse::<u64>()
            .map_err(|_| Error::invalid_operation(format!("expected a fraction like 9/10, got {text}")))
    };
    let (num, den) = text
        .split_once('/')
        .ok_or_else(|| Error::invalid_operation(format!("expected a fraction like 9/10, got {text}")))?;
    Ok((parse(num)?, parse(den)?))
}

fn usage(text: &str) -> Error {
    Error::invalid_operation(format!("usage: {text}"))
}

fn print_banner() {
    println!("Credence {} - probabilistic concept base", env!("CARGO_PKG_VERSION"));
    println!("Type help for commands, quit to exit.\n");
}

fn print_error(error: &Error) {
    eprintln!("\x1b[31mError: {error}\x1b[0m");
}

fn help_text() -> &'static str {
    "\
commands:
    concept <name> [description...]                  create a concept
    concepts                                         list concepts
    type <name> [transitive|symmetric|reflexive|irreflexive]
                                                     create a relationship type
    types                                            list relationship types
    deprecate <type> [reason...]                     retire a type
    assert <from> <type> <to> <n/d> <n/d>            assert an edge (prob, conf)
    relationships                                    list stored edges
    find <substring>                                 search concepts by name
    infer <start> [<type>] [depth <n>] [min-p <n/d>] [min-c <n/d>]
                                                     derive relationships
    save <path> / load <path>                        snapshot to/from disk
    login <principal> / whoami                       switch caller identity
    help / quit"
}
