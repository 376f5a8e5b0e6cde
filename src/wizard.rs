//! Step-by-step workflow controller.
//!
//! The workflow is a fixed sequence of steps:
//!
//! ```text
//! 1 Master Images           convert + archive, reorder, apply  → Lot###.jpg
//!   ↓ forward: finalize (Lot###.jpg → Final Lot Sticker Images)
//! 2 Final Lot Images        user drops auction photos into the dump
//!   ↓ forward: blocked until the dump holds images, then list them
//! 3 Review Auction Photos   reorder, apply                     → Auction###.jpg
//!   ↓
//! 4 Watermark
//! ```
//!
//! All state lives in [`WizardState`]; the filesystem stays the owner of the
//! files themselves and both orders are re-listed after every commit. Going
//! back never touches the disk.
//!
//! Every operation returns the status lines it produced so the caller can
//! show and log them.

use crate::config::LotConfig;
use crate::convert::{self, ConvertError, ConvertSettings};
use crate::finalize;
use crate::imaging::ImageBackend;
use crate::layout::Layout;
use crate::naming::NamingTemplate;
use crate::order::{OrderError, OrderedSet, ReorderError};
use crate::output::{format_convert_report, format_listing, format_move_results, format_rename_results};
use crate::rename::{self, RenameError};
use crate::scan::{self, ScanError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Reorder(#[from] ReorderError),
    #[error(transparent)]
    Rename(#[from] RenameError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Step {
    MasterImages,
    FinalLotImages,
    ReviewAuctionPhotos,
    Watermark,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::MasterImages,
        Step::FinalLotImages,
        Step::ReviewAuctionPhotos,
        Step::Watermark,
    ];

    /// 1-based position in the workflow.
    pub fn number(self) -> usize {
        match self {
            Step::MasterImages => 1,
            Step::FinalLotImages => 2,
            Step::ReviewAuctionPhotos => 3,
            Step::Watermark => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::MasterImages => "Master Images",
            Step::FinalLotImages => "Final Lot Sticker Images",
            Step::ReviewAuctionPhotos => "Review Auction Photos",
            Step::Watermark => "Watermark & Resize",
        }
    }

    pub fn next(self) -> Option<Step> {
        Step::ALL.get(self.number()).copied()
    }

    pub fn previous(self) -> Option<Step> {
        self.number().checked_sub(2).map(|i| Step::ALL[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

/// Which of the two ordered sequences an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    Lots,
    Auction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Moved(Step),
    /// The step did not change; the message says what is missing.
    Blocked(String),
    /// Already at the first or last step.
    AtBoundary,
}

/// Outcome of [`Wizard::navigate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub navigation: Navigation,
    pub lines: Vec<String>,
}

/// Everything the wizard remembers between operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: Step,
    pub lot_order: OrderedSet,
    pub auction_order: OrderedSet,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: Step::MasterImages,
            lot_order: OrderedSet::default(),
            auction_order: OrderedSet::default(),
        }
    }
}

pub struct Wizard<B: ImageBackend> {
    layout: Layout,
    config: LotConfig,
    backend: B,
    state: WizardState,
}

impl<B: ImageBackend> Wizard<B> {
    /// Create the layout directories and list the dump into the lot order.
    pub fn open(layout: Layout, config: LotConfig, backend: B) -> Result<Self, WizardError> {
        layout.ensure()?;
        let mut wizard = Self {
            layout,
            config,
            backend,
            state: WizardState::default(),
        };
        wizard.state.lot_order = wizard.list_dump()?;
        Ok(wizard)
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn order(&self, sequence: Sequence) -> &OrderedSet {
        match sequence {
            Sequence::Lots => &self.state.lot_order,
            Sequence::Auction => &self.state.auction_order,
        }
    }

    fn order_mut(&mut self, sequence: Sequence) -> &mut OrderedSet {
        match sequence {
            Sequence::Lots => &mut self.state.lot_order,
            Sequence::Auction => &mut self.state.auction_order,
        }
    }

    fn template(&self, sequence: Sequence) -> NamingTemplate {
        match sequence {
            Sequence::Lots => self.config.lot_template(),
            Sequence::Auction => self.config.auction_template(),
        }
    }

    fn list_dump(&self) -> Result<OrderedSet, WizardError> {
        let files = scan::list(&self.layout.dump, &self.config.extensions())?;
        Ok(OrderedSet::new(files)?)
    }

    fn listing_lines(&self, sequence: Sequence) -> Vec<String> {
        let title = match sequence {
            Sequence::Lots => "Lot images",
            Sequence::Auction => "Auction photos",
        };
        format_listing(title, self.order(sequence).files())
    }

    // ========================================================================
    // Step 1: Master Images
    // ========================================================================

    /// Convert and archive the dump, then list it into the lot order.
    pub fn run_master(&mut self) -> Result<Vec<String>, WizardError> {
        let settings = ConvertSettings::from_config(&self.config);
        let report = convert::convert_and_archive(&self.layout, &settings, &self.backend)?;

        let mut lines = vec![format!(
            "Running step 1 on {} files",
            report.results.len()
        )];
        lines.extend(format_convert_report(&report, &self.layout.dump));

        self.state.lot_order = self.list_dump()?;
        lines.extend(self.listing_lines(Sequence::Lots));
        Ok(lines)
    }

    /// Move one entry of an order. Nothing touches the disk.
    pub fn move_item(
        &mut self,
        sequence: Sequence,
        from: usize,
        to: usize,
    ) -> Result<Vec<String>, WizardError> {
        self.order_mut(sequence).move_element(from, to)?;
        Ok(self.listing_lines(sequence))
    }

    /// Replace an order with the given file names. Nothing touches the disk.
    pub fn reorder<S: AsRef<str>>(
        &mut self,
        sequence: Sequence,
        names: &[S],
    ) -> Result<Vec<String>, WizardError> {
        self.order_mut(sequence).reorder_by_names(names)?;
        Ok(self.listing_lines(sequence))
    }

    /// Commit an order to disk, then re-list it.
    pub fn apply_order(&mut self, sequence: Sequence) -> Result<Vec<String>, WizardError> {
        let template = self.template(sequence);
        let total = self.order(sequence).len();
        let results = rename::commit_order(self.order(sequence).files(), &template)?;

        let mut lines = vec![format!("Applying new order ({} files)", total)];
        lines.extend(format_rename_results(&results, total));

        *self.order_mut(sequence) = self.list_dump()?;
        Ok(lines)
    }

    pub fn move_lot(&mut self, from: usize, to: usize) -> Result<Vec<String>, WizardError> {
        self.move_item(Sequence::Lots, from, to)
    }

    pub fn move_auction(&mut self, from: usize, to: usize) -> Result<Vec<String>, WizardError> {
        self.move_item(Sequence::Auction, from, to)
    }

    pub fn apply_lot_order(&mut self) -> Result<Vec<String>, WizardError> {
        self.apply_order(Sequence::Lots)
    }

    pub fn apply_auction_order(&mut self) -> Result<Vec<String>, WizardError> {
        self.apply_order(Sequence::Auction)
    }

    // ========================================================================
    // Step 2: Final Lot Images
    // ========================================================================

    /// Move canonical lot images from the dump to the final output directory.
    pub fn finalize_lots(&mut self) -> Result<Vec<String>, WizardError> {
        let results = finalize::finalize(
            &self.layout.dump,
            &self.layout.final_output,
            &self.config.lot_template(),
            &self.config.extensions(),
        )?;
        self.state.lot_order = self.list_dump()?;
        Ok(format_move_results(&results))
    }

    // ========================================================================
    // Step 3: Review Auction Photos
    // ========================================================================

    /// List the dump into the auction order.
    pub fn refresh_auction(&mut self) -> Result<Vec<String>, WizardError> {
        self.state.auction_order = self.list_dump()?;
        Ok(self.listing_lines(Sequence::Auction))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Move one step. Forward from step 2 requires images in the dump.
    pub fn navigate(&mut self, direction: Direction) -> Result<Transition, WizardError> {
        let current = self.state.step;
        let target = match direction {
            Direction::Forward => current.next(),
            Direction::Back => current.previous(),
        };
        let Some(target) = target else {
            return Ok(Transition {
                navigation: Navigation::AtBoundary,
                lines: Vec::new(),
            });
        };

        let mut lines = Vec::new();
        if direction == Direction::Forward {
            match current {
                Step::MasterImages => lines.extend(self.finalize_lots()?),
                Step::FinalLotImages => {
                    // Gate on the dump, where auction photos are dropped and read, not the archive
                    if !scan::has_images(&self.layout.dump, &self.config.extensions())? {
                        let message = format!(
                            "No images found. Add your auction photos to {}",
                            self.layout.dump.display()
                        );
                        return Ok(Transition {
                            navigation: Navigation::Blocked(message.clone()),
                            lines: vec![message],
                        });
                    }
                    lines.extend(self.refresh_auction()?);
                }
                Step::ReviewAuctionPhotos | Step::Watermark => {}
            }
        }

        self.state.step = target;
        lines.push(format!("Step {}: {}", target.number(), target.title()));
        Ok(Transition {
            navigation: Navigation::Moved(target),
            lines,
        })
    }
}
