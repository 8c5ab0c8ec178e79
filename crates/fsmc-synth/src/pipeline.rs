//! Synthesis pipeline
//!
//! ```text
//! Fsm ─> validate ─> encode ─> build_table ─> minimize_all ─> assemble ─> Netlist
//!            │                                                              │
//!            └──────────────────────── SynthesisReport <────────────────────┘
//! ```
//!
//! Validation errors stop the pipeline before any encoding happens;
//! warnings are carried into the report and never block.

use crate::config::SynthConfig;
use crate::encoding::{encode_inputs, encode_states, InputEncoding, StateEncoding};
use crate::error::{Result, SynthError};
use crate::minimize::{minimize_all, Minimizer, MintermCover, MAX_VARIABLES};
use crate::report::{ReportInputs, SynthesisReport};
use crate::truth_table::{build_table, TruthTable};
use fsmc_graph::{validate, Fsm, ValidationReport};
use fsmc_netlist::{MinimizedLogic, Netlist, NetlistAssembler};
use tracing::{info, warn};

/// Artifacts of one synthesis run
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub validation: ValidationReport,
    pub state_encoding: StateEncoding,
    pub input_encoding: InputEncoding,
    pub table: TruthTable,
    /// Minimized functions, `None` for a skeleton
    pub logic: Option<MinimizedLogic>,
    pub netlist: Netlist,
    pub report: SynthesisReport,
}

/// Runs the pipeline with a configuration and a minimizer
pub struct Synthesizer {
    config: SynthConfig,
    minimizer: Box<dyn Minimizer>,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(SynthConfig::default())
    }
}

impl Synthesizer {
    /// Synthesizer using the minterm cover
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            minimizer: Box::new(MintermCover),
        }
    }

    /// Replace the minimizer
    pub fn with_minimizer(mut self, minimizer: Box<dyn Minimizer>) -> Self {
        self.minimizer = minimizer;
        self
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn minimizer_name(&self) -> &str {
        self.minimizer.name()
    }

    /// Validate, encode, tabulate, minimize and assemble
    pub fn synthesize(&self, fsm: &Fsm) -> Result<Synthesis> {
        self.run(fsm, true)
    }

    /// Validate, encode and tabulate, then assemble registers and pins with
    /// every register input and output tied low
    pub fn skeleton(&self, fsm: &Fsm) -> Result<Synthesis> {
        self.run(fsm, false)
    }

    fn run(&self, fsm: &Fsm, with_logic: bool) -> Result<Synthesis> {
        self.config.check()?;
        let options = &self.config.synthesis;
        info!(
            "Synthesizing '{}': {} states, {} transitions",
            options.module_name,
            fsm.state_count(),
            fsm.transition_count()
        );

        let validation = validate(fsm);
        if !validation.valid {
            return Err(SynthError::Validation(validation));
        }
        for warning in &validation.warnings {
            warn!("{}", warning);
        }

        let state_encoding = encode_states(fsm.states());
        let input_encoding = encode_inputs(fsm.transitions());
        let variables = state_encoding.width() + input_encoding.width();
        if variables > MAX_VARIABLES {
            return Err(SynthError::TooManyVariables(variables));
        }

        let table = build_table(fsm, &state_encoding, &input_encoding)?;

        let logic = if with_logic {
            Some(minimize_all(
                &table,
                self.minimizer.as_ref(),
                options.parallel,
                options.verify,
            )?)
        } else {
            None
        };

        let initial = fsm
            .initial_state()
            .and_then(|s| state_encoding.code(s.id))
            .ok_or_else(|| SynthError::Internal("initial state has no code".to_string()))?;

        let netlist = NetlistAssembler::new(options.module_name.clone())
            .with_names(self.config.naming.clone())
            .with_initial_state(initial.as_slice().to_vec())
            .assemble(
                table.state_bits,
                table.input_bits,
                table.output_bits,
                logic.as_ref(),
            )?;

        let report = SynthesisReport::build(ReportInputs {
            module_name: &options.module_name,
            minimizer: logic.as_ref().map(|_| self.minimizer.name()),
            fsm,
            validation: &validation,
            states: &state_encoding,
            inputs: &input_encoding,
            table: &table,
            logic: logic.as_ref(),
            stats: netlist.stats(),
        });

        Ok(Synthesis {
            validation,
            state_encoding,
            input_encoding,
            table,
            logic,
            netlist,
            report,
        })
    }
}

/// Synthesize with the default configuration and minimizer
pub fn synthesize(fsm: &Fsm) -> Result<Synthesis> {
    Synthesizer::default().synthesize(fsm)
}
