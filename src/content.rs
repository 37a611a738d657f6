//! Fixed site copy and the context the model is seeded with.

pub const SHOP_NAME: &str = "Aroma Beans Coffee";

pub const CHAT_TITLE: &str = "Chatbot";

pub const GREETING: &str = "Olá! 👋\nComo posso te ajudar hoje?";

pub const TYPING: &str = "Digitando";

pub const INPUT_PLACEHOLDER: &str = "Mensagem...";

/// Paragraphs of the about panel. Lines starting with `- ` render as list
/// items, lines wrapped in `_` render in italics.
pub const ABOUT: &[&str] = &[
    "Olá! Eu sou o assistente virtual da Aroma Beans Coffee. ☕",
    "Fui criado para tornar sua experiência mais interativa. Comigo, você pode tirar dúvidas sobre a cafeteria ou personalizar a aparência do site.",
    "Minhas funções:",
    "- Responder perguntas sobre nosso cardápio, preços e horários.",
    "- Alterar as cores do site! Tente me pedir algo como:",
    "_\"Mude o fundo para preto e o texto para branco\"_",
    "_\"Altere a cor do texto do 'sobre' para azul\"_",
    "- Você também pode pedir para _\"Voltar às cores originais\"_.",
    "Abra o chat no canto inferior direito para começar!",
];

/// Hidden first message of every session.
pub const SHOP_CONTEXT: &str = r##"Você é o assistente virtual da Aroma Beans Coffee, uma cafeteria artesanal. Responda sempre em português, de forma simpática e breve.

Informações da cafeteria:
- Endereço: Rua dos Grãos, 123, Centro.
- Horário: segunda a sexta, das 7h às 19h; sábados e domingos, das 8h às 14h.
- Cardápio e preços:
  - Espresso: R$ 6,00
  - Cappuccino: R$ 9,50
  - Latte: R$ 10,00
  - Mocha: R$ 11,50
  - Cold brew: R$ 12,00
  - Pão de queijo: R$ 5,00
  - Bolo do dia (fatia): R$ 8,00
- Wi-Fi gratuito e opções de leite vegetal (aveia e amêndoa) sem custo adicional.

Você também pode mudar as cores do site. Quando o usuário pedir para mudar cores, responda SOMENTE com JSON, sem texto adicional:
- Para mudar uma cor: {"action": "change_color", "target": "<alvo>", "color": "<cor CSS>"}
- Para várias mudanças, use uma lista: [{"action": "change_color", ...}, {"action": "change_color", ...}]
- Para voltar às cores originais: {"action": "reset_color"}

Alvos válidos:
- "background": cor de fundo do site
- "text": cor do texto do site
- "aboutBackground": cor de fundo da seção "Sobre"
- "aboutText": cor do texto da seção "Sobre"

Use cores CSS em hexadecimal (por exemplo "#000000") ou nomes em inglês (por exemplo "black"). Para qualquer outra pergunta, responda normalmente em texto."##;
