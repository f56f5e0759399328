//! 标签排版（Zebra ZPL / TSC TSPL）
//!
//! 这里只生成打印机程序文本；发送到打印机由 [`PrintSink`] 负责。

use crate::error::{AppError, AppResult};
use crate::models::{LabelLanguage, PartSticker, StockMoveLabel};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// 打印输出端
pub trait PrintSink: Send + Sync {
    /// 提交一个打印任务，返回实际使用的任务名
    fn send(&self, job_name: &str, data: &[u8]) -> AppResult<String>;
}

/// 同名任务最多追加的序号
const MAX_JOB_SUFFIX: usize = 1000;

/// 把打印任务写成 `<dir>/<job>.prn`，由外部程序转发到打印机
///
/// 已有同名文件时不覆盖，而是写到 `<job>-1.prn`、`<job>-2.prn` ...
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn job_path(&self, job_name: &str) -> PathBuf {
        self.dir.join(format!("{}.prn", job_stem(job_name)))
    }
}

/// 文件名里只保留字母数字、`-` 和 `_`
fn job_stem(job_name: &str) -> String {
    job_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl PrintSink for FileSink {
    fn send(&self, job_name: &str, data: &[u8]) -> AppResult<String> {
        std::fs::create_dir_all(&self.dir)?;
        let stem = job_stem(job_name);
        for suffix in 0..MAX_JOB_SUFFIX {
            let name = if suffix == 0 {
                stem.clone()
            } else {
                format!("{}-{}", stem, suffix)
            };
            let path = self.dir.join(format!("{}.prn", name));
            // create_new: 并发请求不会互相覆盖
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(data)?;
            tracing::info!("打印任务 {} 已写入 {} ({} 字节)", name, path.display(), data.len());
            return Ok(name);
        }
        Err(AppError::operation_failed(format!(
            "too many print jobs named {}",
            stem
        )))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LabelRenderer {
    language: LabelLanguage,
    width_chars: usize,
}

impl LabelRenderer {
    pub fn new(language: LabelLanguage, width_chars: usize) -> Self {
        Self {
            language,
            width_chars: width_chars.max(1),
        }
    }

    pub fn language(&self) -> LabelLanguage {
        self.language
    }

    /// 零件贴纸: 零件号、名称、厂商、OEM 编码 + Code128 条码
    pub fn render_part_sticker(&self, sticker: &PartSticker) -> String {
        let mut lines = vec![TextLine::large(sticker.part_number.as_str())];
        if let Some(name) = sticker.part_name.as_deref() {
            lines.push(TextLine::normal(name));
        }
        if let Some(manufacturer) = sticker.manufacturer.as_deref() {
            lines.push(TextLine::normal(manufacturer));
        }
        if !sticker.oem_codes.is_empty() {
            lines.push(TextLine::small(format!("OEM: {}", sticker.oem_codes.join(", "))));
        }
        self.render(&lines, &sticker.part_number, sticker.copies)
    }

    /// 库存移动标签: 单据号、零件、数量、客户
    pub fn render_stock_move_label(&self, label: &StockMoveLabel) -> String {
        let mut lines = vec![
            TextLine::large(label.item_key.as_str()),
            TextLine::normal(format!("QTY: {}", label.quantity)),
            TextLine::normal(format!("DOC: {}", label.doc_number)),
        ];
        if let Some(account) = label.account_key.as_deref() {
            lines.push(TextLine::small(account));
        }
        self.render(&lines, &label.doc_number, label.copies)
    }

    fn render(&self, lines: &[TextLine], barcode: &str, copies: u32) -> String {
        let copies = copies.max(1);
        match self.language {
            LabelLanguage::Zpl => self.render_zpl(lines, barcode, copies),
            LabelLanguage::Tspl => self.render_tspl(lines, barcode, copies),
        }
    }

    fn render_zpl(&self, lines: &[TextLine], barcode: &str, copies: u32) -> String {
        let mut out = String::from("^XA\n^CI28\n");
        let mut y = 20;
        for line in lines {
            let text = zpl_escape(&self.fit(&line.text));
            out.push_str(&format!(
                "^FO20,{y}^A0N,{h},{h}^FD{text}^FS\n",
                h = line.size.zpl_height()
            ));
            y += line.size.zpl_height() + 10;
        }
        out.push_str(&format!(
            "^FO20,{y}^BY2^BCN,60,Y,N,N^FD{}^FS\n",
            zpl_escape(barcode)
        ));
        out.push_str(&format!("^PQ{copies}\n^XZ\n"));
        out
    }

    fn render_tspl(&self, lines: &[TextLine], barcode: &str, copies: u32) -> String {
        let mut out = String::from("SIZE 50 mm, 30 mm\r\nGAP 2 mm, 0 mm\r\nDIRECTION 1\r\nCLS\r\n");
        let mut y = 20;
        for line in lines {
            let text = tspl_escape(&self.fit(&line.text));
            out.push_str(&format!(
                "TEXT 20,{y},\"{font}\",0,1,1,\"{text}\"\r\n",
                font = line.size.tspl_font()
            ));
            y += line.size.zpl_height() + 10;
        }
        out.push_str(&format!(
            "BARCODE 20,{y},\"128\",60,1,0,2,2,\"{}\"\r\n",
            tspl_escape(barcode)
        ));
        out.push_str(&format!("PRINT 1,{copies}\r\n"));
        out
    }

    fn fit(&self, text: &str) -> String {
        text.chars().take(self.width_chars).collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum TextSize {
    Large,
    Normal,
    Small,
}

impl TextSize {
    fn zpl_height(&self) -> u32 {
        match self {
            Self::Large => 40,
            Self::Normal => 28,
            Self::Small => 22,
        }
    }

    fn tspl_font(&self) -> &'static str {
        match self {
            Self::Large => "4",
            Self::Normal => "3",
            Self::Small => "2",
        }
    }
}

struct TextLine {
    text: String,
    size: TextSize,
}

impl TextLine {
    fn new(text: impl Into<String>, size: TextSize) -> Self {
        Self { text: text.into(), size }
    }

    fn large(text: impl Into<String>) -> Self {
        Self::new(text, TextSize::Large)
    }

    fn normal(text: impl Into<String>) -> Self {
        Self::new(text, TextSize::Normal)
    }

    fn small(text: impl Into<String>) -> Self {
        Self::new(text, TextSize::Small)
    }
}

/// `^` 和 `~` 是 ZPL 的命令前缀，不能出现在字段数据中
fn zpl_escape(text: &str) -> String {
    text.replace(['^', '~'], " ")
}

fn tspl_escape(text: &str) -> String {
    text.replace('"', "\\[\"]")
}
