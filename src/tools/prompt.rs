//! 使用者確認提示
//!
//! 破壞性操作前的 yes/no 詢問；只有不分大小寫的 "yes" 才算同意

use anyhow::{Context, Result};
use console::Term;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

/// 唯一接受的同意字串
pub const AFFIRMATIVE_ANSWER: &str = "yes";

/// 向使用者詢問並取得一行回答
pub trait UserPrompt {
    fn ask(&self, question: &str) -> Result<String>;

    /// 詢問 yes/no 問題，回傳使用者是否同意
    fn confirm(&self, question: &str) -> Result<bool> {
        Ok(is_affirmative(&self.ask(question)?))
    }
}

/// 判斷回答是否為同意（完全相符，不分大小寫）
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case(AFFIRMATIVE_ANSWER)
}

/// 讀取回答的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// dialoguer 輸入框，畫在 stderr 上
    Interactive,
    /// 直接從 stdin 讀一行
    Line,
}

/// 依 stderr 與 stdin 是否為終端機決定讀取方式
///
/// dialoguer 的輸入框畫在 stderr 並從終端機讀鍵，兩者缺一就改為讀 stdin 的一行
#[must_use]
pub const fn input_mode(stderr_is_term: bool, stdin_is_term: bool) -> InputMode {
    if stderr_is_term && stdin_is_term {
        InputMode::Interactive
    } else {
        InputMode::Line
    }
}

/// 從主控台讀取回答
///
/// 在終端機上使用 dialoguer 輸入框，否則（例如 stderr 被導向或管線輸入）直接讀取 stdin 的一行
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl UserPrompt for ConsolePrompt {
    fn ask(&self, question: &str) -> Result<String> {
        let term = Term::stderr();

        if input_mode(term.is_term(), io::stdin().is_terminal()) == InputMode::Interactive {
            let answer: String = Input::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text_on(&term)
                .context("Failed to read answer")?;
            return Ok(answer);
        }

        print!("{question}: ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("Failed to read answer from stdin")?;
        Ok(answer)
    }
}
