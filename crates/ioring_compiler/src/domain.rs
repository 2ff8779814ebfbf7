//! Voltage domain resolution.
//!
//! A voltage domain is a contiguous run of analog supply and return pads in
//! final ring order, with exactly one supply provider and one return
//! provider. Declared domains are taken as given and validated; everything
//! else is grouped into automatic runs by semantic group key. Analog IO pads
//! never start or break a run; they are attached to a domain afterwards.
//!
//! The resolved [`DomainMap`] is read-only once built; later stages only
//! query it.

use crate::codes;
use crate::ids::{DomainId, SignalId};
use crate::placement::{Placement, Position};
use crate::signal::{ProviderHint, Role, Signal, SignalClass, SignalTable};
use ioring_common::base_name;
use ioring_config::{DomainDecl, GroupRule, IncompleteDomainPolicy, PatternTable, ResolvedNets};
use ioring_diagnostics::{Diagnostic, DiagnosticSink, Label, Location};
use serde::Serialize;

/// Supply tokens removed when deriving a group key, longest first.
const SUPPLY_TOKENS: [&str; 10] = [
    "AVDD", "AVSS", "DVDD", "DVSS", "VDDA", "VSSA", "AGND", "VDD", "VSS", "GND",
];

/// A resolved voltage domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoltageDomain {
    /// Domain ID, ascending in ring order.
    pub id: DomainId,
    /// Declared name, or the derived group key.
    pub name: String,
    /// `true` if the user declared this domain.
    pub declared: bool,
    /// Analog supply and return members in final order.
    pub members: Vec<SignalId>,
    /// The supply provider.
    pub vdd_provider: SignalId,
    /// The return provider.
    pub vss_provider: SignalId,
    /// Supplies and returns of incomplete runs adopted by this domain.
    pub adopted: Vec<SignalId>,
    /// Analog IO pads referencing this domain.
    pub analog_io: Vec<SignalId>,
    /// Final-order index of the first member.
    pub first: usize,
    /// Final-order index of the last member.
    pub last: usize,
}

impl VoltageDomain {
    /// Members that are not providers, adopted signals included.
    pub fn consumers(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.members
            .iter()
            .chain(self.adopted.iter())
            .copied()
            .filter(move |&id| id != self.vdd_provider && id != self.vss_provider)
    }

    /// Distance in final order from this domain's span to `[first, last]`.
    fn gap(&self, first: usize, last: usize) -> usize {
        if self.last < first {
            first - self.last
        } else if last < self.first {
            self.first - last
        } else {
            0
        }
    }
}

/// A name-level summary of one domain, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainSummary {
    /// Domain name.
    pub name: String,
    /// `true` if the user declared this domain.
    pub declared: bool,
    /// Supply provider name.
    pub vdd_provider: String,
    /// Return provider name.
    pub vss_provider: String,
    /// Member names in final order.
    pub members: Vec<String>,
    /// Consumer names in final order, adopted ones last.
    pub consumers: Vec<String>,
    /// Adopted member names.
    pub adopted: Vec<String>,
    /// Attached analog IO names.
    pub analog_io: Vec<String>,
}

/// All resolved domains plus the signal-to-domain index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainMap {
    domains: Vec<VoltageDomain>,
    by_signal: Vec<Option<DomainId>>,
}

impl DomainMap {
    fn with_signals(count: usize) -> Self {
        Self {
            domains: Vec::new(),
            by_signal: vec![None; count],
        }
    }

    /// All domains in ring order.
    pub fn domains(&self) -> &[VoltageDomain] {
        &self.domains
    }

    /// Returns the domain with the given ID.
    pub fn get(&self, id: DomainId) -> &VoltageDomain {
        &self.domains[id.index()]
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns `true` if no domain was resolved.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// The domain a signal belongs to or references.
    pub fn domain_of(&self, signal: SignalId) -> Option<&VoltageDomain> {
        self.by_signal
            .get(signal.index())
            .copied()
            .flatten()
            .map(|id| self.get(id))
    }

    /// The final role of a signal.
    pub fn role_of(&self, signal: &Signal) -> Role {
        let domain = self.domain_of(signal.id);
        match signal.class {
            SignalClass::AnalogIo => Role::AnalogIo,
            SignalClass::AnalogPower => match domain {
                Some(d) if d.vdd_provider == signal.id => Role::AnalogPowerProvider,
                _ => Role::AnalogPowerConsumer,
            },
            SignalClass::AnalogGround => match domain {
                Some(d) if d.vss_provider == signal.id => Role::AnalogGroundProvider,
                _ => Role::AnalogGroundConsumer,
            },
            SignalClass::DigitalIo => Role::DigitalIo,
            SignalClass::DigitalPower => Role::DigitalPower,
            SignalClass::DigitalGround => Role::DigitalGround,
        }
    }

    /// Name-level summaries of every domain.
    pub fn summaries(&self, signals: &SignalTable) -> Vec<DomainSummary> {
        let names = |ids: &mut dyn Iterator<Item = SignalId>| -> Vec<String> {
            ids.map(|id| signals.get(id).name.clone()).collect()
        };
        self.domains
            .iter()
            .map(|d| DomainSummary {
                name: d.name.clone(),
                declared: d.declared,
                vdd_provider: signals.get(d.vdd_provider).name.clone(),
                vss_provider: signals.get(d.vss_provider).name.clone(),
                members: names(&mut d.members.iter().copied()),
                consumers: names(&mut d.consumers()),
                adopted: names(&mut d.adopted.iter().copied()),
                analog_io: names(&mut d.analog_io.iter().copied()),
            })
            .collect()
    }

    /// Nearest domain to `[first, last]`, optionally restricted to a name.
    /// Ties go to the domain earlier in ring order.
    fn nearest(&self, first: usize, last: usize, name: Option<&str>) -> Option<DomainId> {
        self.domains
            .iter()
            .filter(|d| name.map_or(true, |n| d.name == n))
            .min_by_key(|d| (d.gap(first, last), d.first))
            .map(|d| d.id)
    }

    fn push(&mut self, mut domain: VoltageDomain) -> DomainId {
        let id = DomainId::from_index(self.domains.len());
        domain.id = id;
        for &signal in domain.members.iter().chain(domain.analog_io.iter()) {
            self.by_signal[signal.index()] = Some(id);
        }
        self.domains.push(domain);
        id
    }

    fn assign(&mut self, id: DomainId, signal: SignalId) {
        self.by_signal[signal.index()] = Some(id);
    }
}

/// Two group rules of equal precedence disagree on a signal's group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousGroup {
    /// First matching rule as `key -> group`.
    pub first: String,
    /// Conflicting rule as `key -> group`.
    pub second: String,
}

/// Semantic group key of an analog supply or return.
///
/// The domain override wins; then the longest matching group rule; then the
/// name with its first supply token removed and `_` trimmed.
pub fn group_key(
    name: &str,
    domain_override: Option<&str>,
    rules: &[GroupRule],
) -> Result<String, AmbiguousGroup> {
    if let Some(domain) = domain_override {
        return Ok(domain.to_string());
    }
    let key = base_name(name).to_ascii_uppercase();
    let matching: Vec<&GroupRule> = rules
        .iter()
        .filter(|rule| rule.match_kind.matches(&key, &rule.key))
        .collect();
    if let Some(best) = matching.iter().max_by_key(|rule| rule.key.len()) {
        let tied = matching
            .iter()
            .find(|rule| rule.key.len() == best.key.len() && rule.group != best.group);
        if let Some(other) = tied {
            let describe = |r: &GroupRule| format!("'{}' -> {}", r.key, r.group);
            let (a, b): (&GroupRule, &GroupRule) =
                if rules_index(rules, best) < rules_index(rules, other) {
                    (*best, *other)
                } else {
                    (*other, *best)
                };
            return Err(AmbiguousGroup {
                first: describe(a),
                second: describe(b),
            });
        }
        return Ok(best.group.clone());
    }
    Ok(derive_group(&key))
}

fn rules_index(rules: &[GroupRule], rule: &GroupRule) -> usize {
    rules
        .iter()
        .position(|r| std::ptr::eq(r, rule))
        .unwrap_or(usize::MAX)
}

/// Group key derived from an upper-cased name alone.
pub fn derive_group(key: &str) -> String {
    for token in SUPPLY_TOKENS {
        if let Some(at) = key.find(token) {
            let mut rest = String::with_capacity(key.len());
            rest.push_str(&key[..at]);
            rest.push_str(&key[at + token.len()..]);
            return rest.trim_matches('_').to_string();
        }
    }
    key.trim_matches('_').to_string()
}

struct Draft {
    name: String,
    declared: bool,
    members: Vec<SignalId>,
    analog_io: Vec<SignalId>,
    vdd_name: Option<String>,
    vss_name: Option<String>,
    first: usize,
    last: usize,
}

enum Pick {
    Found(SignalId),
    Missing,
    Failed,
}

struct Resolver<'a> {
    signals: &'a SignalTable,
    placement: &'a Placement,
    sink: &'a DiagnosticSink,
    claimed: Vec<bool>,
}

/// Resolves voltage domains over the final placement.
pub fn resolve_domains(
    signals: &SignalTable,
    placement: &Placement,
    patterns: &PatternTable,
    nets: &ResolvedNets,
    declarations: &[DomainDecl],
    sink: &DiagnosticSink,
) -> DomainMap {
    let _span = tracing::debug_span!("domains").entered();
    let mut resolver = Resolver {
        signals,
        placement,
        sink,
        claimed: vec![false; signals.len()],
    };

    let mut drafts: Vec<Draft> = declarations
        .iter()
        .filter_map(|decl| resolver.declared(decl))
        .collect();
    drafts.extend(resolver.automatic_runs(&patterns.groups));
    drafts.sort_by_key(|d| d.first);

    let mut map = DomainMap::with_signals(signals.len());
    let mut incomplete = Vec::new();
    for draft in drafts {
        let vdd = resolver.pick(&draft, SignalClass::AnalogPower, draft.vdd_name.as_deref());
        let vss = resolver.pick(&draft, SignalClass::AnalogGround, draft.vss_name.as_deref());
        match (vdd, vss) {
            (Pick::Found(vdd), Pick::Found(vss)) => {
                tracing::debug!(
                    domain = %draft.name,
                    vdd = %signals.get(vdd).name,
                    vss = %signals.get(vss).name,
                    members = draft.members.len(),
                    "domain resolved"
                );
                map.push(VoltageDomain {
                    id: DomainId::from_raw(0),
                    name: draft.name,
                    declared: draft.declared,
                    members: draft.members,
                    vdd_provider: vdd,
                    vss_provider: vss,
                    adopted: Vec::new(),
                    analog_io: draft.analog_io,
                    first: draft.first,
                    last: draft.last,
                });
            }
            (Pick::Failed, _) | (_, Pick::Failed) => {}
            (vdd, vss) => {
                let missing = match (vdd, vss) {
                    (Pick::Missing, Pick::Missing) => "VDD and VSS providers",
                    (Pick::Missing, _) => "a VDD provider",
                    _ => "a VSS provider",
                };
                incomplete.push((draft, missing));
            }
        }
    }

    for (draft, missing) in incomplete {
        resolver.adopt_or_report(&mut map, draft, missing, nets.incomplete_domains);
    }
    resolver.attach_analog_io(&mut map);

    for domain in &mut map.domains {
        domain.analog_io.sort_by_key(|&id| placement.ordinal(id));
    }
    map
}

impl Resolver<'_> {
    fn ordinal(&self, id: SignalId) -> usize {
        self.placement.ordinal(id).unwrap_or(usize::MAX)
    }

    fn member_labels(&self, ids: &[SignalId]) -> Vec<Label> {
        ids.iter()
            .map(|&id| Label::secondary(self.signals.get(id).location(), "member"))
            .collect()
    }

    fn declared(&mut self, decl: &DomainDecl) -> Option<Draft> {
        let location = Location::Domain(decl.name.clone());
        let mut ok = true;
        let mut listed: Vec<SignalId> = Vec::new();

        for text in &decl.members {
            let signal = text
                .parse::<Position>()
                .ok()
                .and_then(|position| self.placement.signal_at(&position));
            let Some(id) = signal else {
                self.sink.emit(
                    Diagnostic::error(
                        codes::UNKNOWN_MEMBER_POSITION,
                        format!("domain '{}' lists '{text}', which is not an occupied pad position", decl.name),
                        location.clone(),
                    )
                    .with_label(Label::primary(Location::Position(text.clone()), "no pad here")),
                );
                ok = false;
                continue;
            };
            let signal = self.signals.get(id);
            if signal.class.is_digital() {
                self.sink.emit(
                    Diagnostic::error(
                        codes::DIGITAL_DOMAIN_MEMBER,
                        format!(
                            "domain '{}' lists digital pad '{}' at '{text}'",
                            decl.name, signal.name
                        ),
                        location.clone(),
                    )
                    .with_label(Label::primary(signal.location(), format!("{}", signal.class))),
                );
                ok = false;
                continue;
            }
            if self.claimed[id.index()] {
                self.sink.emit(
                    Diagnostic::error(
                        codes::OVERLAPPING_DOMAINS,
                        format!(
                            "pad '{}' at '{text}' belongs to more than one declared domain",
                            signal.name
                        ),
                        location.clone(),
                    )
                    .with_label(Label::primary(signal.location(), "claimed twice")),
                );
                ok = false;
                continue;
            }
            if !listed.contains(&id) {
                listed.push(id);
            }
        }
        for &id in &listed {
            self.claimed[id.index()] = true;
        }
        if !ok || listed.is_empty() {
            return None;
        }

        listed.sort_by_key(|&id| self.ordinal(id));
        let first = self.ordinal(listed[0]);
        let last = self.ordinal(listed[listed.len() - 1]);

        let offending: Vec<SignalId> = self.placement.pads[first..=last]
            .iter()
            .map(|pad| pad.signal)
            .filter(|id| !listed.contains(id) && self.signals.get(*id).class != SignalClass::AnalogIo)
            .collect();
        if !offending.is_empty() {
            let names: Vec<&str> = offending
                .iter()
                .map(|&id| self.signals.get(id).name.as_str())
                .collect();
            let mut diag = Diagnostic::error(
                codes::DOMAIN_NOT_CONTIGUOUS,
                format!(
                    "members of domain '{}' are interrupted by {}",
                    decl.name,
                    names.join(", ")
                ),
                location,
            )
            .with_note("only analog IO pads may sit between members of a domain");
            for &id in &offending {
                diag = diag.with_label(Label::primary(self.signals.get(id).location(), "interrupts the domain"));
            }
            self.sink.emit(diag);
            return None;
        }

        let (members, analog_io): (Vec<SignalId>, Vec<SignalId>) = listed
            .into_iter()
            .partition(|&id| self.signals.get(id).class.is_analog_supply());
        Some(Draft {
            name: decl.name.clone(),
            declared: true,
            members,
            analog_io,
            vdd_name: decl.vdd_provider.clone(),
            vss_name: decl.vss_provider.clone(),
            first,
            last,
        })
    }

    fn automatic_runs(&self, rules: &[GroupRule]) -> Vec<Draft> {
        let mut runs: Vec<Draft> = Vec::new();
        let mut current: Option<(String, Draft)> = None;
        let close = |current: &mut Option<(String, Draft)>, runs: &mut Vec<Draft>| {
            if let Some((_, draft)) = current.take() {
                runs.push(draft);
            }
        };

        for (ordinal, pad) in self.placement.pads.iter().enumerate() {
            let signal = self.signals.get(pad.signal);
            if self.claimed[signal.id.index()] {
                close(&mut current, &mut runs);
                continue;
            }
            match signal.class {
                SignalClass::AnalogIo => {}
                SignalClass::AnalogPower | SignalClass::AnalogGround => {
                    let key = match group_key(&signal.name, signal.domain.as_deref(), rules) {
                        Ok(key) => key,
                        Err(ambiguous) => {
                            self.sink.emit(
                                Diagnostic::error(
                                    codes::AMBIGUOUS_GROUP,
                                    format!(
                                        "group rules {} and {} both match '{}' with equal precedence",
                                        ambiguous.first, ambiguous.second, signal.name
                                    ),
                                    signal.location(),
                                )
                                .with_help("add a `domain` override to the signal"),
                            );
                            close(&mut current, &mut runs);
                            continue;
                        }
                    };
                    let extends = matches!(&current, Some((run_key, _)) if *run_key == key);
                    match current.as_mut() {
                        Some((_, draft)) if extends => {
                            draft.members.push(signal.id);
                            draft.last = ordinal;
                        }
                        _ => {
                            close(&mut current, &mut runs);
                            let name = if key.is_empty() {
                                base_name(&signal.name).to_ascii_uppercase()
                            } else {
                                key.clone()
                            };
                            current = Some((
                                key,
                                Draft {
                                    name,
                                    declared: false,
                                    members: vec![signal.id],
                                    analog_io: Vec::new(),
                                    vdd_name: None,
                                    vss_name: None,
                                    first: ordinal,
                                    last: ordinal,
                                },
                            ));
                        }
                    }
                }
                _ => close(&mut current, &mut runs),
            }
        }
        close(&mut current, &mut runs);
        tracing::debug!(runs = runs.len(), "automatic runs formed");
        runs
    }

    fn pick(&self, draft: &Draft, class: SignalClass, named: Option<&str>) -> Pick {
        let candidates: Vec<&Signal> = draft
            .members
            .iter()
            .map(|&id| self.signals.get(id))
            .filter(|s| s.class == class)
            .collect();

        let chosen = if let Some(name) = named {
            match candidates.iter().find(|s| s.name == name) {
                Some(s) => Some(s.id),
                None => {
                    self.sink.emit(
                        Diagnostic::error(
                            codes::UNKNOWN_PROVIDER,
                            format!(
                                "provider '{name}' of domain '{}' is not a {class} member of the domain",
                                draft.name
                            ),
                            Location::Domain(draft.name.clone()),
                        ),
                    );
                    return Pick::Failed;
                }
            }
        } else if let Some(designated) = candidates.iter().find(|s| s.hint == ProviderHint::Designated) {
            candidates
                .iter()
                .find(|s| s.name == designated.name && s.hint != ProviderHint::ConsumerOnly)
                .map(|s| s.id)
        } else {
            candidates
                .iter()
                .find(|s| s.hint != ProviderHint::ConsumerOnly)
                .map(|s| s.id)
        };

        let Some(chosen) = chosen else {
            return Pick::Missing;
        };
        for extra in candidates
            .iter()
            .filter(|s| s.hint == ProviderHint::Designated && s.id != chosen)
        {
            let provider = self.signals.get(chosen);
            let mut diag = Diagnostic::warning(
                codes::PROVIDER_DEMOTED,
                format!(
                    "'{}' is designated as provider but domain '{}' already uses '{}'; it becomes a consumer",
                    extra.name, draft.name, provider.name
                ),
                extra.location(),
            )
            .with_label(Label::secondary(provider.location(), "provider"));
            if let Some(device) = &extra.device {
                diag = diag.with_note(format!(
                    "a provider cell from the device table given as override ('{device}') is replaced by the consumer cell"
                ));
            }
            self.sink.emit(diag);
        }
        Pick::Found(chosen)
    }

    fn adopt_or_report(
        &self,
        map: &mut DomainMap,
        draft: Draft,
        missing: &str,
        policy: IncompleteDomainPolicy,
    ) {
        let location = Location::Domain(draft.name.clone());
        let target = match policy {
            IncompleteDomainPolicy::AdoptNearest if !draft.declared => {
                map.nearest(draft.first, draft.last, None)
            }
            _ => None,
        };

        let Some(target) = target else {
            let mut diag = Diagnostic::error(
                codes::DOMAIN_INCOMPLETE,
                format!("domain '{}' has no {missing}", draft.name),
                location,
            );
            for label in self.member_labels(&draft.members) {
                diag = diag.with_label(label);
            }
            if policy == IncompleteDomainPolicy::AdoptNearest && !draft.declared {
                diag = diag.with_note("no complete domain exists to adopt its members");
            }
            self.sink.emit(diag.with_help(
                "add the missing supply or return, mark one with a `*_provider` role, or set `nets.incomplete_domains = \"adopt_nearest\"`",
            ));
            return;
        };

        let adopter = map.get(target).name.clone();
        let mut diag = Diagnostic::warning(
            codes::DOMAIN_ADOPTED,
            format!(
                "domain '{}' has no {missing}; its members join domain '{adopter}' as consumers",
                draft.name
            ),
            location,
        );
        for label in self.member_labels(&draft.members) {
            diag = diag.with_label(label);
        }
        self.sink.emit(diag);

        for &id in &draft.members {
            map.assign(target, id);
        }
        map.domains[target.index()].adopted.extend(draft.members);
        map.domains[target.index()].analog_io.extend(draft.analog_io.iter().copied());
        for id in draft.analog_io {
            map.assign(target, id);
        }
    }

    fn attach_analog_io(&self, map: &mut DomainMap) {
        for (ordinal, pad) in self.placement.pads.iter().enumerate() {
            let signal = self.signals.get(pad.signal);
            if signal.class != SignalClass::AnalogIo || map.domain_of(signal.id).is_some() {
                continue;
            }
            let target = match signal.domain.as_deref() {
                Some(name) => match map.nearest(ordinal, ordinal, Some(name)) {
                    Some(id) => id,
                    None => {
                        self.sink.emit(
                            Diagnostic::error(
                                codes::UNKNOWN_DOMAIN,
                                format!(
                                    "analog IO '{}' references domain '{name}', which does not exist",
                                    signal.name
                                ),
                                signal.location(),
                            )
                            .with_note(format!(
                                "known domains: {}",
                                if map.is_empty() {
                                    "none".to_string()
                                } else {
                                    map.domains
                                        .iter()
                                        .map(|d| d.name.as_str())
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                }
                            )),
                        );
                        continue;
                    }
                },
                None => match map.nearest(ordinal, ordinal, None) {
                    Some(id) => id,
                    None => {
                        self.sink.emit(
                            Diagnostic::error(
                                codes::ORPHAN_ANALOG_IO,
                                format!(
                                    "analog IO '{}' has no voltage domain to reference",
                                    signal.name
                                ),
                                signal.location(),
                            )
                            .with_help("add an analog supply and return pair to the ring"),
                        );
                        continue;
                    }
                },
            };
            tracing::trace!(signal = %signal.name, domain = %map.get(target).name, "analog IO attached");
            map.assign(target, signal.id);
            map.domains[target.index()].analog_io.push(signal.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::place;
    use ioring_config::{MatchKind, PlacementOrder, RingConfig};

    struct Fixture {
        signals: SignalTable,
        placement: Placement,
    }

    fn signal(i: usize, name: &str, class: SignalClass, hint: ProviderHint) -> Signal {
        Signal {
            id: SignalId::from_index(i),
            name: name.to_string(),
            raw_index: i,
            class,
            hint,
            direction: None,
            device: None,
            domain: None,
            inner_position: None,
        }
    }

    fn fixture(specs: &[(&str, SignalClass, ProviderHint)]) -> Fixture {
        let signals: Vec<Signal> = specs
            .iter()
            .enumerate()
            .map(|(i, (name, class, hint))| signal(i, name, *class, *hint))
            .collect();
        let count = signals.len();
        let signals = SignalTable::new(signals, count);
        let ring = RingConfig::new(0, count, PlacementOrder::Counterclockwise);
        let placement = place(&signals, &ring, &DiagnosticSink::new());
        Fixture { signals, placement }
    }

    fn resolve(fx: &Fixture, decls: &[DomainDecl], nets: &ResolvedNets) -> (DomainMap, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let map = resolve_domains(
            &fx.signals,
            &fx.placement,
            &PatternTable::default(),
            nets,
            decls,
            &sink,
        );
        (map, sink)
    }

    use ProviderHint::{Auto, ConsumerOnly, Designated};
    use SignalClass::{AnalogGround as G, AnalogIo as Io, AnalogPower as P, DigitalIo as Dio};

    #[test]
    fn derive_group_strips_first_supply_token() {
        assert_eq!(derive_group("AVDD_IB"), "IB");
        assert_eq!(derive_group("AVSS_IB"), "IB");
        assert_eq!(derive_group("VDDSAR"), "SAR");
        assert_eq!(derive_group("AVDDH1"), "H1");
        assert_eq!(derive_group("AVDD"), "");
        assert_eq!(derive_group("VSSA_X"), "X");
    }

    #[test]
    fn group_rules_longest_wins_and_ties_conflict() {
        let rule = |key: &str, group: &str| GroupRule {
            key: key.into(),
            group: group.into(),
            match_kind: MatchKind::Substring,
        };
        let rules = vec![rule("IB", "BIAS"), rule("_IB", "IBX")];
        assert_eq!(group_key("AVDD_IB", None, &rules).unwrap(), "IBX");
        assert_eq!(group_key("AVDD_IB", Some("MINE"), &rules).unwrap(), "MINE");

        let rules = vec![rule("IB", "BIAS"), rule("DD", "CORE")];
        let err = group_key("AVDD_IB", None, &rules).unwrap_err();
        assert_eq!(err.first, "'IB' -> BIAS");
        assert_eq!(err.second, "'DD' -> CORE");
    }

    #[test]
    fn single_pair_forms_one_domain() {
        let fx = fixture(&[("VCM", Io, Auto), ("AVDD", P, Auto), ("AVSS", G, Auto)]);
        let (map, sink) = resolve(&fx, &[], &ResolvedNets::default());
        assert!(!sink.has_errors());
        assert_eq!(map.len(), 1);
        let d = &map.domains()[0];
        assert_eq!(d.vdd_provider, SignalId::from_raw(1));
        assert_eq!(d.vss_provider, SignalId::from_raw(2));
        assert_eq!(d.analog_io, vec![SignalId::from_raw(0)]);
        assert_eq!(
            map.role_of(fx.signals.get(SignalId::from_raw(1))),
            Role::AnalogPowerProvider
        );
    }

    #[test]
    fn different_keys_split_runs() {
        let fx = fixture(&[
            ("AVDD_IB", P, Auto),
            ("AVSS_IB", G, Auto),
            ("AVDD_SAR", P, Auto),
            ("AVSS_SAR", G, Auto),
        ]);
        let (map, sink) = resolve(&fx, &[], &ResolvedNets::default());
        assert!(!sink.has_errors());
        let names: Vec<&str> = map.domains().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["IB", "SAR"]);
    }

    #[test]
    fn interrupted_same_name_is_never_merged() {
        let fx = fixture(&[("AVDDH1", P, Auto), ("CLK", Dio, Auto), ("AVDDH1", P, Auto)]);
        let (map, sink) = resolve(&fx, &[], &ResolvedNets::default());
        assert!(map.is_empty());
        let incomplete = sink
            .diagnostics()
            .into_iter()
            .filter(|d| d.code == codes::DOMAIN_INCOMPLETE)
            .count();
        assert_eq!(incomplete, 2);
    }

    #[test]
    fn analog_io_is_transparent_to_runs() {
        let fx = fixture(&[("AVDD", P, Auto), ("VCM", Io, Auto), ("AVSS", G, Auto)]);
        let (map, sink) = resolve(&fx, &[], &ResolvedNets::default());
        assert!(!sink.has_errors());
        assert_eq!(map.len(), 1);
        assert_eq!(map.domains()[0].members.len(), 2);
    }

    #[test]
    fn duplicate_designations_keep_first_occurrence() {
        let fx = fixture(&[
            ("AVDD", P, Auto),
            ("AVDD", P, Designated),
            ("AVDD", P, Designated),
            ("AVSS", G, Auto),
        ]);
        let (map, sink) = resolve(&fx, &[], &ResolvedNets::default());
        let d = &map.domains()[0];
        assert_eq!(d.vdd_provider, SignalId::from_raw(0));
        assert_eq!(sink.warning_count(), 2);
        assert_eq!(d.consumers().count(), 2);
    }

    #[test]
    fn consumer_only_is_skipped() {
        let fx = fixture(&[("AVDD_A", P, ConsumerOnly), ("AVDD_A", P, Auto), ("AVSS_A", G, Auto)]);
        let (map, sink) = resolve(&fx, &[], &ResolvedNets::default());
        assert!(!sink.has_errors());
        assert_eq!(map.domains()[0].vdd_provider, SignalId::from_raw(1));
    }

    #[test]
    fn declared_domain_contiguity() {
        let fx = fixture(&[
            ("AVDD_A", P, Auto),
            ("CLK", Dio, Auto),
            ("AVSS_A", G, Auto),
        ]);
        let decl = DomainDecl {
            name: "A".into(),
            members: vec!["left_0".into(), "left_2".into()],
            vdd_provider: None,
            vss_provider: None,
        };
        let (_, sink) = resolve(&fx, &[decl], &ResolvedNets::default());
        let diags = sink.diagnostics();
        assert_eq!(diags[0].code, codes::DOMAIN_NOT_CONTIGUOUS);
        assert!(diags[0].message.contains("CLK"));
    }

    #[test]
    fn declared_domain_errors() {
        let fx = fixture(&[("AVDD", P, Auto), ("AVSS", G, Auto), ("CLK", Dio, Auto)]);
        let decl = |members: &[&str], vdd: Option<&str>| DomainDecl {
            name: "D".into(),
            members: members.iter().map(|m| m.to_string()).collect(),
            vdd_provider: vdd.map(String::from),
            vss_provider: None,
        };
        let cases = [
            (vec![decl(&["left_9"], None)], codes::UNKNOWN_MEMBER_POSITION),
            (vec![decl(&["left_1", "left_2"], None)], codes::DIGITAL_DOMAIN_MEMBER),
            (vec![decl(&["left_0", "left_1"], Some("NOPE"))], codes::UNKNOWN_PROVIDER),
            (
                vec![decl(&["left_0", "left_1"], None), decl(&["left_1"], None)],
                codes::OVERLAPPING_DOMAINS,
            ),
        ];
        for (decls, code) in cases {
            let (_, sink) = resolve(&fx, &decls, &ResolvedNets::default());
            assert!(
                sink.diagnostics().iter().any(|d| d.code == code),
                "expected {code}"
            );
        }
    }

    #[test]
    fn declared_provider_by_name() {
        let fx = fixture(&[("AVDD_X", P, Auto), ("AVDD_Y", P, Auto), ("AVSS", G, Auto)]);
        let decl = DomainDecl {
            name: "MIX".into(),
            members: vec!["left_0".into(), "left_1".into(), "left_2".into()],
            vdd_provider: Some("AVDD_Y".into()),
            vss_provider: None,
        };
        let (map, sink) = resolve(&fx, &[decl], &ResolvedNets::default());
        assert!(!sink.has_errors());
        assert_eq!(map.domains()[0].vdd_provider, SignalId::from_raw(1));
        assert!(map.domains()[0].declared);
    }

    #[test]
    fn adopt_nearest_policy() {
        let fx = fixture(&[
            ("AVDD", P, Auto),
            ("AVSS", G, Auto),
            ("AVDD_LONE", P, Auto),
        ]);
        let nets = ResolvedNets {
            incomplete_domains: IncompleteDomainPolicy::AdoptNearest,
            ..Default::default()
        };
        let (map, sink) = resolve(&fx, &[], &nets);
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics()[0].code, codes::DOMAIN_ADOPTED);
        let d = &map.domains()[0];
        assert_eq!(d.adopted, vec![SignalId::from_raw(2)]);
        assert_eq!(d.members.len(), 2);
        assert_eq!(
            map.role_of(fx.signals.get(SignalId::from_raw(2))),
            Role::AnalogPowerConsumer
        );
    }

    #[test]
    fn analog_io_attachment() {
        let mut specs_fx = fixture(&[
            ("VCM", Io, Auto),
            ("AVDD_A", P, Auto),
            ("AVSS_A", G, Auto),
            ("CLK", Dio, Auto),
            ("AVDD_B", P, Auto),
            ("AVSS_B", G, Auto),
            ("VREF", Io, Auto),
        ]);
        let (map, sink) = resolve(&specs_fx, &[], &ResolvedNets::default());
        assert!(!sink.has_errors());
        assert_eq!(map.domain_of(SignalId::from_raw(0)).unwrap().name, "A");
        assert_eq!(map.domain_of(SignalId::from_raw(6)).unwrap().name, "B");

        let mut rebuilt: Vec<Signal> = specs_fx.signals.iter().cloned().collect();
        rebuilt[0].domain = Some("B".into());
        specs_fx.signals = SignalTable::new(rebuilt.clone(), 7);
        let (map, _) = resolve(&specs_fx, &[], &ResolvedNets::default());
        assert_eq!(map.domain_of(SignalId::from_raw(0)).unwrap().name, "B");

        rebuilt[0].domain = Some("Z".into());
        specs_fx.signals = SignalTable::new(rebuilt, 7);
        let (_, sink) = resolve(&specs_fx, &[], &ResolvedNets::default());
        assert_eq!(sink.diagnostics()[0].code, codes::UNKNOWN_DOMAIN);
    }

    #[test]
    fn orphan_analog_io() {
        let fx = fixture(&[("VCM", Io, Auto), ("CLK", Dio, Auto)]);
        let (_, sink) = resolve(&fx, &[], &ResolvedNets::default());
        assert_eq!(sink.diagnostics()[0].code, codes::ORPHAN_ANALOG_IO);
    }
}
