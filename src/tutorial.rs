use anyhow::Result;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TutorialStep {
    pub title: &'static str,
    pub description: &'static str,
    pub code: &'static str,
}

pub const STEPS: [TutorialStep; 3] = [
    TutorialStep {
        title: "Add Dark Mode Toggle",
        description: "First, add a button or switch component that will toggle between light and dark modes.",
        code: r#"// Add this to your main component or layout
const [darkMode, setDarkMode] = useState(false);

// Toggle function
const toggleDarkMode = () => {
  setDarkMode(!darkMode);
  document.documentElement.classList.toggle('dark');
};

// Add this button to your UI
<button onClick={toggleDarkMode}>
  {darkMode ? '🌙' : '☀️'}
</button>"#,
    },
    TutorialStep {
        title: "Configure Tailwind Dark Mode",
        description: "Set up your Tailwind CSS configuration to support dark mode classes.",
        code: r#"// tailwind.config.js
module.exports = {
  darkMode: 'class',
  // ... rest of your config
}"#,
    },
    TutorialStep {
        title: "Add Dark Mode Styles",
        description: "Add dark mode variants to your components using Tailwind's dark: modifier.",
        code: r#"<div className="bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100">
  {/* Your content */}
</div>"#,
    },
];

/// Where copied code samples go. A browser build writes to the system
/// clipboard; the CLI prints.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Walkthrough shown while a site owner is implementing dark mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tutorial {
    step: usize,
    completed: bool,
}

impl Tutorial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts at `step` (zero-based), clamped to the last step.
    pub fn at_step(step: usize) -> Self {
        Self {
            step: step.min(STEPS.len() - 1),
            completed: false,
        }
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn current(&self) -> &'static TutorialStep {
        &STEPS[self.step]
    }

    pub fn is_last_step(&self) -> bool {
        self.step == STEPS.len() - 1
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// "Step 2 of 3", or the prompt for the URL form once finished.
    pub fn progress_label(&self) -> String {
        if self.completed {
            "Enter your website URL to verify dark mode implementation".to_string()
        } else {
            format!("Step {} of {}", self.step + 1, STEPS.len())
        }
    }

    /// Moves to the next step; on the last step marks the walkthrough done.
    pub fn next(&mut self) {
        if self.is_last_step() {
            self.completed = true;
        } else {
            self.step += 1;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn copy_code(&self, clipboard: &dyn Clipboard) -> Result<()> {
        let step = self.current();
        clipboard.write_text(step.code)?;
        info!(action = "copy", component = "tutorial", step = self.step + 1, title = step.title, "Copied code sample");
        Ok(())
    }
}
